use crate::domain::locker::{LockerId, LockerStatus};
use crate::domain::money::FeeSchedule;
use crate::domain::otp::Otp;
use crate::domain::package::{PackageId, PackageStatus};
use std::fmt;

/// The message an actor sees after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Booking went through; the customer is asked to pay next.
    Booked {
        package: PackageId,
        locker: LockerId,
        rider_name: String,
    },
    PaymentSettled {
        package: PackageId,
        status: PackageStatus,
    },
    JobAccepted {
        package: PackageId,
        access_code: Otp,
    },
    LockerRequested {
        package: PackageId,
    },
    Stored {
        package: PackageId,
        locker: LockerId,
        otp: Otp,
        payment_due: bool,
    },
    /// A stored package the customer can go and collect.
    ReadyForPickup {
        package: PackageId,
        locker: LockerId,
        otp: Otp,
    },
    Retrieved {
        package: PackageId,
        locker: Option<LockerId>,
        status: PackageStatus,
    },
    Delivered {
        package: PackageId,
    },
    Failed {
        package: PackageId,
    },
    LockerStatusChanged {
        locker: LockerId,
        status: LockerStatus,
    },
    SettingsUpdated {
        fees: FeeSchedule,
    },
}

impl Notice {
    pub fn package(&self) -> Option<&PackageId> {
        match self {
            Notice::Booked { package, .. }
            | Notice::PaymentSettled { package, .. }
            | Notice::JobAccepted { package, .. }
            | Notice::LockerRequested { package }
            | Notice::Stored { package, .. }
            | Notice::ReadyForPickup { package, .. }
            | Notice::Retrieved { package, .. }
            | Notice::Delivered { package }
            | Notice::Failed { package } => Some(package),
            Notice::LockerStatusChanged { .. } | Notice::SettingsUpdated { .. } => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Booked {
                package,
                locker,
                rider_name,
            } => write!(
                f,
                "Locker {locker} reserved and assigned to {rider_name} for package {package}. Please pay the service fee."
            ),
            Notice::PaymentSettled {
                package,
                status: PackageStatus::PaidReadyForPickup,
            } => write!(f, "Payment received. Package {package} is ready for rider pickup."),
            Notice::PaymentSettled { package, .. } => {
                write!(f, "Service fee for package {package} paid.")
            }
            Notice::JobAccepted {
                package,
                access_code,
            } => write!(f, "Job {package} accepted. Locker access code: {access_code}"),
            Notice::LockerRequested { package } => write!(
                f,
                "Locker storage requested for package {package}. A rider will be notified."
            ),
            Notice::Stored {
                package,
                locker,
                otp,
                payment_due,
            } => {
                write!(f, "Package {package} stored in locker {locker}. Customer OTP: {otp}.")?;
                if *payment_due {
                    write!(f, " The service fee is due on retrieval.")
                } else {
                    write!(f, " Already paid.")
                }
            }
            Notice::ReadyForPickup {
                package,
                locker,
                otp,
            } => write!(
                f,
                "Package {package} is waiting in locker {locker}. Use OTP {otp} to open it."
            ),
            Notice::Retrieved {
                package,
                locker: Some(locker),
                ..
            } => write!(
                f,
                "Receipt of package {package} confirmed. Locker {locker} is free again."
            ),
            Notice::Retrieved { package, .. } => {
                write!(f, "Receipt of package {package} confirmed.")
            }
            Notice::Delivered { package } => write!(f, "Package {package} marked as delivered."),
            Notice::Failed { package } => write!(f, "Delivery of package {package} failed."),
            Notice::LockerStatusChanged { locker, status } => {
                write!(f, "Locker {locker} is now {status}.")
            }
            Notice::SettingsUpdated { fees } => write!(
                f,
                "Service fee set to {} with a commission rate of {}.",
                fees.service_fee.value(),
                fees.commission_rate.value()
            ),
        }
    }
}
