use crate::application::notice::Notice;
use crate::application::report::{self, AdminReport};
use crate::domain::lifecycle::Action;
use crate::domain::locker::{LockerId, LockerStatus, LockerView, occupied_lockers};
use crate::domain::money::{FeeSchedule, Money};
use crate::domain::otp::{CodeGeneratorBox, Otp, PACKAGE_ID_SPACE};
use crate::domain::package::{Package, PackageId, PackageStatus, RiderAssignment};
use crate::domain::ports::{LockerStoreBox, PackageStoreBox};
use crate::domain::rider::{RiderId, RiderRoster};
use crate::error::{DeliveryError, Result};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// What a customer fills in to book a locker.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub customer: String,
    pub locker: Option<LockerId>,
    pub rider: Option<RiderId>,
    pub recipient: Option<String>,
    pub description: Option<String>,
}

/// The package as it stands after a transition, and the message for the actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub package: Package,
    pub notice: Notice,
}

/// The package lifecycle engine.
///
/// `LifecycleEngine` owns the repositories and applies customer, rider and
/// admin actions to them. Every mutating action runs its read, validate and
/// write steps under one lock, so two actions never interleave on the shared
/// store even when the engine is used from several tasks.
pub struct LifecycleEngine {
    package_store: PackageStoreBox,
    locker_store: LockerStoreBox,
    codes: CodeGeneratorBox,
    roster: RiderRoster,
    fees: RwLock<FeeSchedule>,
    transitions: Mutex<()>,
}

impl LifecycleEngine {
    /// Creates a new `LifecycleEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `package_store` - The store for packages.
    /// * `locker_store` - The store for lockers.
    /// * `codes` - Source of OTPs and package numbers.
    /// * `roster` - The riders customers may pick from.
    /// * `fees` - Initial service fee and commission rate.
    pub fn new(
        package_store: PackageStoreBox,
        locker_store: LockerStoreBox,
        codes: CodeGeneratorBox,
        roster: RiderRoster,
        fees: FeeSchedule,
    ) -> Self {
        Self {
            package_store,
            locker_store,
            codes,
            roster,
            fees: RwLock::new(fees),
            transitions: Mutex::new(()),
        }
    }

    pub fn roster(&self) -> &RiderRoster {
        &self.roster
    }

    pub async fn fees(&self) -> FeeSchedule {
        *self.fees.read().await
    }

    // Customer actions

    /// Creates a package bound for `request.locker` and reserves that locker.
    ///
    /// Both a locker and a rider must be selected; nothing is stored when
    /// either is missing.
    pub async fn book_locker(&self, request: BookingRequest) -> Result<Outcome> {
        let locker = request
            .locker
            .filter(|id| !id.as_str().is_empty())
            .ok_or(DeliveryError::MissingLocker)?;
        let rider_id = request
            .rider
            .filter(|id| !id.as_str().is_empty())
            .ok_or(DeliveryError::MissingRider)?;
        let rider = self
            .roster
            .get(&rider_id)
            .ok_or_else(|| DeliveryError::UnknownRider(rider_id.clone()))?;

        let _guard = self.transitions.lock().await;

        let status = self.locker_status(&locker).await?;
        if status != LockerStatus::Available {
            return Err(DeliveryError::LockerUnavailable { locker, status });
        }

        let id = self.allocate_package_id().await?;
        let package = Package::book(
            id.clone(),
            request.customer,
            request.recipient,
            request.description,
            rider_id.clone(),
            locker.clone(),
        );
        self.package_store.store(package.clone()).await?;

        info!(package = %id, locker = %locker, rider = %rider_id, "locker booked");
        Ok(Outcome {
            package,
            notice: Notice::Booked {
                package: id,
                locker,
                rider_name: rider.name.clone(),
            },
        })
    }

    /// Settles the service fee. Paying right after booking releases the
    /// package for pickup; later payments leave the status alone.
    pub async fn pay(&self, customer: &str, id: &PackageId) -> Result<Outcome> {
        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        ensure_owner(&package, customer)?;

        package.pay()?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, status = %package.status, "fee paid");
        Ok(Outcome {
            notice: Notice::PaymentSettled {
                package: id.clone(),
                status: package.status,
            },
            package,
        })
    }

    /// Redirects a package that is out for door delivery into a locker. Any
    /// rider may then pick it up.
    pub async fn request_locker(&self, customer: &str, id: &PackageId) -> Result<Outcome> {
        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        ensure_owner(&package, customer)?;

        package.request_locker()?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, "locker requested");
        Ok(Outcome {
            notice: Notice::LockerRequested {
                package: id.clone(),
            },
            package,
        })
    }

    /// Shows the retrieval OTP of a stored package to its owner.
    pub async fn reveal_retrieval_otp(&self, customer: &str, id: &PackageId) -> Result<Otp> {
        let package = self.load(id).await?;
        ensure_owner(&package, customer)?;

        match (package.status, package.customer_retrieval_otp()) {
            (PackageStatus::StoredInLocker, Some(otp)) => Ok(otp.clone()),
            _ => Err(DeliveryError::OtpNotReady(id.clone())),
        }
    }

    /// Completes retrieval when `otp` matches the package's code. An unpaid
    /// package has its fee settled here and ends as `Retrieved & Paid`.
    pub async fn confirm_receipt(
        &self,
        customer: &str,
        id: &PackageId,
        otp: &str,
    ) -> Result<Outcome> {
        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        ensure_owner(&package, customer)?;

        let freed = package.retrieve(otp)?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, status = %package.status, "package retrieved");
        Ok(Outcome {
            notice: Notice::Retrieved {
                package: id.clone(),
                locker: freed,
                status: package.status,
            },
            package,
        })
    }

    // Rider actions

    /// Takes a job: the rider is assigned and receives the target locker's
    /// access code.
    pub async fn accept_job(&self, rider: &RiderId, id: &PackageId) -> Result<Outcome> {
        if !self.roster.contains(rider) {
            return Err(DeliveryError::UnknownRider(rider.clone()));
        }

        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        let open = package.rider == RiderAssignment::Pending;
        if !open && !package.rider.is_assigned_to(rider) {
            return Err(DeliveryError::NotAssigned {
                package: id.clone(),
                rider: rider.clone(),
            });
        }

        let access_code = package.accept(rider.clone(), &*self.codes)?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, rider = %rider, "job accepted");
        Ok(Outcome {
            notice: Notice::JobAccepted {
                package: id.clone(),
                access_code,
            },
            package,
        })
    }

    /// Puts the package in a locker and issues the customer's retrieval OTP.
    ///
    /// A booked package always goes into its target locker; `locker` is only
    /// needed, and must be available, when there is no target.
    pub async fn mark_stored(
        &self,
        rider: &RiderId,
        id: &PackageId,
        locker: Option<LockerId>,
    ) -> Result<Outcome> {
        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        ensure_assigned(&package, rider)?;
        package.check(Action::MarkStored)?;

        let requested = locker.filter(|l| !l.as_str().is_empty());
        let locker = match (package.target_locker_id.clone(), requested) {
            (Some(target), Some(requested)) if requested != target => {
                return Err(DeliveryError::LockerMismatch {
                    package: id.clone(),
                    target,
                    requested,
                });
            }
            (Some(target), _) => target,
            (None, None) => return Err(DeliveryError::MissingLockerNumber),
            (None, Some(requested)) => {
                let status = self.locker_status(&requested).await?;
                if status != LockerStatus::Available {
                    return Err(DeliveryError::LockerUnavailable {
                        locker: requested,
                        status,
                    });
                }
                requested
            }
        };

        let otp = package.store_in(locker.clone(), &*self.codes)?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, locker = %locker, paid = package.paid, "package stored");
        Ok(Outcome {
            notice: Notice::Stored {
                package: id.clone(),
                locker,
                otp,
                payment_due: !package.paid,
            },
            package,
        })
    }

    pub async fn mark_delivered(&self, rider: &RiderId, id: &PackageId) -> Result<Outcome> {
        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        ensure_assigned(&package, rider)?;

        package.deliver()?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, rider = %rider, "package delivered");
        Ok(Outcome {
            notice: Notice::Delivered {
                package: id.clone(),
            },
            package,
        })
    }

    pub async fn mark_failed(&self, rider: &RiderId, id: &PackageId) -> Result<Outcome> {
        let _guard = self.transitions.lock().await;
        let mut package = self.load(id).await?;
        ensure_assigned(&package, rider)?;

        package.fail()?;
        self.package_store.store(package.clone()).await?;

        info!(package = %id, rider = %rider, "delivery failed");
        Ok(Outcome {
            notice: Notice::Failed {
                package: id.clone(),
            },
            package,
        })
    }

    /// Jobs the rider can act on: their own reserved, paid or door-delivery
    /// packages, plus redirect requests nobody has taken yet.
    pub async fn available_jobs(&self, rider: &RiderId) -> Result<Vec<Package>> {
        let packages = self.package_store.get_all().await?;
        Ok(packages
            .into_iter()
            .filter(|p| match p.status {
                PackageStatus::LockerReserved
                | PackageStatus::PaidReadyForPickup
                | PackageStatus::OutForDelivery => p.rider.is_assigned_to(rider),
                PackageStatus::LockerRequested => p.rider == RiderAssignment::Pending,
                _ => false,
            })
            .collect())
    }

    pub async fn rider_earnings(&self, rider: &RiderId) -> Result<Money> {
        let packages = self.package_store.get_all().await?;
        let fees = self.fees().await;
        report::rider_earnings(&packages, rider, &fees)
    }

    // Admin actions

    /// Takes a locker in or out of service. Occupancy is derived from the
    /// packages and cannot be set by hand.
    pub async fn set_locker_status(&self, id: &LockerId, status: LockerStatus) -> Result<Notice> {
        let _guard = self.transitions.lock().await;
        let mut locker = self
            .locker_store
            .get(id)
            .await?
            .ok_or_else(|| DeliveryError::LockerNotFound(id.clone()))?;

        match status {
            LockerStatus::Occupied => {
                return Err(DeliveryError::ValidationError(format!(
                    "Locker {id} becomes occupied only through a booking or a stored package"
                )));
            }
            LockerStatus::Maintenance => {
                let current = self.locker_status(id).await?;
                if current == LockerStatus::Occupied {
                    return Err(DeliveryError::LockerUnavailable {
                        locker: id.clone(),
                        status: current,
                    });
                }
                locker.under_maintenance = true;
            }
            LockerStatus::Available => locker.under_maintenance = false,
        }
        self.locker_store.store(locker).await?;

        let status = self.locker_status(id).await?;
        info!(locker = %id, status = %status, "locker status changed");
        Ok(Notice::LockerStatusChanged {
            locker: id.clone(),
            status,
        })
    }

    /// Replaces the fee schedule. Kept in memory only.
    pub async fn update_settings(
        &self,
        service_fee: Decimal,
        commission_rate: Decimal,
    ) -> Result<Notice> {
        let fees = FeeSchedule::new(service_fee, commission_rate)?;
        *self.fees.write().await = fees;

        info!(%service_fee, %commission_rate, "settings updated");
        Ok(Notice::SettingsUpdated { fees })
    }

    pub async fn report(&self) -> Result<AdminReport> {
        let packages = self.package_store.get_all().await?;
        let lockers = self.list_lockers().await?;
        let fees = self.fees().await;
        AdminReport::compute(&packages, &lockers, &fees)
    }

    // Queries

    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        self.package_store.get_all().await
    }

    pub async fn get_package(&self, id: &PackageId) -> Result<Package> {
        self.load(id).await
    }

    pub async fn packages_for_customer(&self, customer: &str) -> Result<Vec<Package>> {
        let packages = self.package_store.get_all().await?;
        Ok(packages
            .into_iter()
            .filter(|p| p.customer == customer)
            .collect())
    }

    /// One notice per package of `customer` waiting in a locker.
    pub async fn ready_for_pickup(&self, customer: &str) -> Result<Vec<Notice>> {
        let packages = self.packages_for_customer(customer).await?;
        Ok(packages
            .into_iter()
            .filter(|p| p.status == PackageStatus::StoredInLocker)
            .filter_map(|p| {
                let otp = p.customer_retrieval_otp()?.clone();
                let locker = p.locker_id.clone()?;
                Some(Notice::ReadyForPickup {
                    package: p.id,
                    locker,
                    otp,
                })
            })
            .collect())
    }

    pub async fn list_lockers(&self) -> Result<Vec<LockerView>> {
        let lockers = self.locker_store.get_all().await?;
        let packages = self.package_store.get_all().await?;
        let occupied = occupied_lockers(&packages);
        Ok(lockers.iter().map(|l| l.view(&occupied)).collect())
    }

    pub async fn locker_status(&self, id: &LockerId) -> Result<LockerStatus> {
        let locker = self
            .locker_store
            .get(id)
            .await?
            .ok_or_else(|| DeliveryError::LockerNotFound(id.clone()))?;
        let packages = self.package_store.get_all().await?;
        let occupied = packages.iter().any(|p| p.locker_refs().any(|l| l == id));
        Ok(locker.status(occupied))
    }

    async fn load(&self, id: &PackageId) -> Result<Package> {
        self.package_store
            .get(id)
            .await?
            .ok_or_else(|| DeliveryError::PackageNotFound(id.clone()))
    }

    /// Picks a free `PK####` id, starting from a generated number and
    /// walking forward until an unused one turns up.
    async fn allocate_package_id(&self) -> Result<PackageId> {
        let start = u32::from(self.codes.package_number());
        let space = u32::from(PACKAGE_ID_SPACE);
        for offset in 0..space {
            let number = ((start + offset) % space) as u16;
            let id = PackageId::from_number(number);
            if !self.package_store.exists(&id).await? {
                return Ok(id);
            }
        }
        Err(DeliveryError::IdSpaceExhausted)
    }
}

fn ensure_owner(package: &Package, customer: &str) -> Result<()> {
    if package.customer == customer {
        Ok(())
    } else {
        Err(DeliveryError::NotOwner {
            package: package.id.clone(),
            customer: customer.to_string(),
        })
    }
}

fn ensure_assigned(package: &Package, rider: &RiderId) -> Result<()> {
    if package.rider.is_assigned_to(rider) {
        Ok(())
    } else {
        Err(DeliveryError::NotAssigned {
            package: package.id.clone(),
            rider: rider.clone(),
        })
    }
}
