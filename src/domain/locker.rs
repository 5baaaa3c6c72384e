use crate::domain::package::Package;
use crate::error::DeliveryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockerId(String);

impl LockerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockerStatus {
    Available,
    Occupied,
    Maintenance,
}

impl fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LockerStatus::Available => "Available",
            LockerStatus::Occupied => "Occupied",
            LockerStatus::Maintenance => "Maintenance",
        };
        f.write_str(label)
    }
}

impl FromStr for LockerStatus {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(LockerStatus::Available),
            "occupied" => Ok(LockerStatus::Occupied),
            "maintenance" => Ok(LockerStatus::Maintenance),
            other => Err(DeliveryError::ValidationError(format!(
                "Unknown locker status '{other}'"
            ))),
        }
    }
}

/// A storage cell as kept in the repository.
///
/// Occupancy is not stored. It follows from which active packages point at
/// the locker, see [`occupied_lockers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locker {
    pub id: LockerId,
    pub location: String,
    pub under_maintenance: bool,
}

impl Locker {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: LockerId::new(id),
            location: location.into(),
            under_maintenance: false,
        }
    }

    /// Occupied wins over the maintenance flag: a parcel inside still has to
    /// come out.
    pub fn status(&self, occupied: bool) -> LockerStatus {
        if occupied {
            LockerStatus::Occupied
        } else if self.under_maintenance {
            LockerStatus::Maintenance
        } else {
            LockerStatus::Available
        }
    }

    pub fn view(&self, occupied: &HashSet<LockerId>) -> LockerView {
        LockerView {
            id: self.id.clone(),
            location: self.location.clone(),
            status: self.status(occupied.contains(&self.id)),
        }
    }
}

/// A locker together with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockerView {
    pub id: LockerId,
    pub location: String,
    pub status: LockerStatus,
}

/// Every locker referenced by a non-terminal package, either as the booked
/// target or as the locker it sits in.
pub fn occupied_lockers<'a>(packages: impl IntoIterator<Item = &'a Package>) -> HashSet<LockerId> {
    packages
        .into_iter()
        .flat_map(|package| package.locker_refs().cloned())
        .collect()
}
