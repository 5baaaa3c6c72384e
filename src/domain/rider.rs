use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(String);

impl RiderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
}

impl Rider {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: RiderId::new(id),
            name: name.into(),
        }
    }
}

/// Static lookup table of couriers. Never mutated by the lifecycle engine.
#[derive(Debug, Clone, Default)]
pub struct RiderRoster {
    riders: Vec<Rider>,
}

impl RiderRoster {
    pub fn new(riders: Vec<Rider>) -> Self {
        Self { riders }
    }

    pub fn get(&self, id: &RiderId) -> Option<&Rider> {
        self.riders.iter().find(|rider| &rider.id == id)
    }

    pub fn contains(&self, id: &RiderId) -> bool {
        self.get(id).is_some()
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }
}
