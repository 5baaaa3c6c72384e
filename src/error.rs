use crate::domain::lifecycle::Action;
use crate::domain::locker::{LockerId, LockerStatus};
use crate::domain::package::{PackageId, PackageStatus};
use crate::domain::rider::RiderId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeliveryError>;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Please select a locker")]
    MissingLocker,
    #[error("Please select a rider")]
    MissingRider,
    #[error("Please enter a locker number or pick a job with a target locker")]
    MissingLockerNumber,
    #[error("Package {0} not found")]
    PackageNotFound(PackageId),
    #[error("Locker {0} not found")]
    LockerNotFound(LockerId),
    #[error("Rider {0} is not on the roster")]
    UnknownRider(RiderId),
    #[error("Locker {locker} is {status}, not available")]
    LockerUnavailable {
        locker: LockerId,
        status: LockerStatus,
    },
    #[error("Package {package} is reserved for locker {target}, not {requested}")]
    LockerMismatch {
        package: PackageId,
        target: LockerId,
        requested: LockerId,
    },
    #[error("Cannot {action} package {package} while it is '{status}'")]
    InvalidTransition {
        package: PackageId,
        status: PackageStatus,
        action: Action,
    },
    #[error("Incorrect OTP for package {0}")]
    IncorrectOtp(PackageId),
    #[error("Package {0} is not in a locker or its OTP is not ready yet")]
    OtpNotReady(PackageId),
    #[error("Package {package} does not belong to {customer}")]
    NotOwner { package: PackageId, customer: String },
    #[error("Package {package} is not assigned to {rider}")]
    NotAssigned { package: PackageId, rider: RiderId },
    #[error("Package {0} is already paid")]
    AlreadyPaid(PackageId),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("No free package ids left")]
    IdSpaceExhausted,
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}
