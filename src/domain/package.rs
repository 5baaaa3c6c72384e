use crate::domain::locker::LockerId;
use crate::domain::otp::Otp;
use crate::domain::rider::RiderId;
use crate::error::DeliveryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel stored in the `rider` field while nobody is assigned.
pub const PENDING_ASSIGNMENT: &str = "Pending Assignment";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Formats a package number as `PK####`.
    pub fn from_number(number: u16) -> Self {
        Self(format!("PK{number:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a package.
///
/// The serialized names are the exact strings any UI layer matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageStatus {
    #[serde(rename = "Locker Reserved, Awaiting Rider Pickup")]
    LockerReserved,
    #[serde(rename = "Paid, Ready for Rider Pickup")]
    PaidReadyForPickup,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Locker Requested")]
    LockerRequested,
    #[serde(rename = "Picked Up, En Route to Locker")]
    PickedUpEnRoute,
    #[serde(rename = "Stored in Locker")]
    StoredInLocker,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Delivery Failed")]
    DeliveryFailed,
    #[serde(rename = "Retrieved & Paid")]
    RetrievedAndPaid,
    #[serde(rename = "Package Retrieved")]
    PackageRetrieved,
}

impl PackageStatus {
    pub const ALL: [PackageStatus; 10] = [
        PackageStatus::LockerReserved,
        PackageStatus::PaidReadyForPickup,
        PackageStatus::OutForDelivery,
        PackageStatus::LockerRequested,
        PackageStatus::PickedUpEnRoute,
        PackageStatus::StoredInLocker,
        PackageStatus::Delivered,
        PackageStatus::DeliveryFailed,
        PackageStatus::RetrievedAndPaid,
        PackageStatus::PackageRetrieved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageStatus::LockerReserved => "Locker Reserved, Awaiting Rider Pickup",
            PackageStatus::PaidReadyForPickup => "Paid, Ready for Rider Pickup",
            PackageStatus::OutForDelivery => "Out for Delivery",
            PackageStatus::LockerRequested => "Locker Requested",
            PackageStatus::PickedUpEnRoute => "Picked Up, En Route to Locker",
            PackageStatus::StoredInLocker => "Stored in Locker",
            PackageStatus::Delivered => "Delivered",
            PackageStatus::DeliveryFailed => "Delivery Failed",
            PackageStatus::RetrievedAndPaid => "Retrieved & Paid",
            PackageStatus::PackageRetrieved => "Package Retrieved",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PackageStatus::Delivered
                | PackageStatus::DeliveryFailed
                | PackageStatus::RetrievedAndPaid
                | PackageStatus::PackageRetrieved
        )
    }

    /// States in which a rider still holds the job and may deliver or fail it.
    pub fn is_active_rider_job(self) -> bool {
        matches!(
            self,
            PackageStatus::LockerReserved
                | PackageStatus::PaidReadyForPickup
                | PackageStatus::OutForDelivery
                | PackageStatus::LockerRequested
                | PackageStatus::PickedUpEnRoute
        )
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is carrying the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiderAssignment {
    Pending,
    Assigned(RiderId),
}

impl RiderAssignment {
    pub fn rider(&self) -> Option<&RiderId> {
        match self {
            RiderAssignment::Pending => None,
            RiderAssignment::Assigned(rider) => Some(rider),
        }
    }

    pub fn is_assigned_to(&self, rider: &RiderId) -> bool {
        self.rider() == Some(rider)
    }
}

impl From<String> for RiderAssignment {
    fn from(value: String) -> Self {
        if value.is_empty() || value == PENDING_ASSIGNMENT {
            RiderAssignment::Pending
        } else {
            RiderAssignment::Assigned(RiderId::new(value))
        }
    }
}

impl From<RiderAssignment> for String {
    fn from(assignment: RiderAssignment) -> Self {
        match assignment {
            RiderAssignment::Pending => PENDING_ASSIGNMENT.to_string(),
            RiderAssignment::Assigned(rider) => rider.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiderAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiderAssignment::Pending => f.write_str(PENDING_ASSIGNMENT),
            RiderAssignment::Assigned(rider) => rider.fmt(f),
        }
    }
}

/// The one code a package may hold at a time.
///
/// The rider's locker code is replaced by the customer's retrieval code at the
/// moment the package is stored, so the two can never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessCodes {
    #[default]
    None,
    RiderAccess(Otp),
    CustomerRetrieval(Otp),
}

/// A parcel moving through the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PackageRecord", into = "PackageRecord")]
pub struct Package {
    pub id: PackageId,
    /// Owning customer.
    pub customer: String,
    pub recipient: Option<String>,
    pub description: Option<String>,
    pub status: PackageStatus,
    pub rider: RiderAssignment,
    /// Locker chosen at booking time.
    pub target_locker_id: Option<LockerId>,
    /// Locker the package is physically stored in.
    pub locker_id: Option<LockerId>,
    pub(crate) codes: AccessCodes,
    pub paid: bool,
}

impl Package {
    /// A package already on its way to the customer's door, created outside
    /// the locker booking flow.
    pub fn dispatched(id: PackageId, customer: impl Into<String>, rider: RiderId) -> Self {
        Self {
            id,
            customer: customer.into(),
            recipient: None,
            description: None,
            status: PackageStatus::OutForDelivery,
            rider: RiderAssignment::Assigned(rider),
            target_locker_id: None,
            locker_id: None,
            codes: AccessCodes::None,
            paid: false,
        }
    }

    pub fn rider_locker_access_code(&self) -> Option<&Otp> {
        match &self.codes {
            AccessCodes::RiderAccess(code) => Some(code),
            _ => None,
        }
    }

    pub fn customer_retrieval_otp(&self) -> Option<&Otp> {
        match &self.codes {
            AccessCodes::CustomerRetrieval(code) => Some(code),
            _ => None,
        }
    }

    pub fn codes(&self) -> &AccessCodes {
        &self.codes
    }

    /// Lockers this package keeps occupied. Terminal packages hold none.
    pub fn locker_refs(&self) -> impl Iterator<Item = &LockerId> {
        let active = !self.status.is_terminal();
        self.locker_id
            .iter()
            .chain(self.target_locker_id.iter())
            .filter(move |_| active)
    }
}

/// Flat form of a [`Package`] with both code columns, as written to CSV or
/// storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: PackageId,
    pub customer: String,
    pub recipient: Option<String>,
    pub description: Option<String>,
    pub status: PackageStatus,
    pub rider: RiderAssignment,
    pub target_locker_id: Option<LockerId>,
    pub locker_id: Option<LockerId>,
    pub rider_locker_access_code: Option<Otp>,
    pub customer_retrieval_otp: Option<Otp>,
    pub paid: bool,
}

impl TryFrom<PackageRecord> for Package {
    type Error = DeliveryError;

    fn try_from(record: PackageRecord) -> Result<Self, Self::Error> {
        let codes = match (record.rider_locker_access_code, record.customer_retrieval_otp) {
            (None, None) => AccessCodes::None,
            (Some(code), None) => AccessCodes::RiderAccess(code),
            (None, Some(code)) => AccessCodes::CustomerRetrieval(code),
            (Some(_), Some(_)) => {
                return Err(DeliveryError::ValidationError(format!(
                    "Package {} holds both a rider code and a retrieval OTP",
                    record.id
                )));
            }
        };

        Ok(Self {
            id: record.id,
            customer: record.customer,
            recipient: record.recipient,
            description: record.description,
            status: record.status,
            rider: record.rider,
            target_locker_id: record.target_locker_id,
            locker_id: record.locker_id,
            codes,
            paid: record.paid,
        })
    }
}

impl From<Package> for PackageRecord {
    fn from(package: Package) -> Self {
        let (rider_locker_access_code, customer_retrieval_otp) = match package.codes {
            AccessCodes::None => (None, None),
            AccessCodes::RiderAccess(code) => (Some(code), None),
            AccessCodes::CustomerRetrieval(code) => (None, Some(code)),
        };

        Self {
            id: package.id,
            customer: package.customer,
            recipient: package.recipient,
            description: package.description,
            status: package.status,
            rider: package.rider,
            target_locker_id: package.target_locker_id,
            locker_id: package.locker_id,
            rider_locker_access_code,
            customer_retrieval_otp,
            paid: package.paid,
        }
    }
}
