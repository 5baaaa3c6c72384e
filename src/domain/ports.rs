use super::locker::{Locker, LockerId};
use super::package::{Package, PackageId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PackageStore: Send + Sync {
    async fn store(&self, package: Package) -> Result<()>;
    async fn get(&self, id: &PackageId) -> Result<Option<Package>>;
    async fn exists(&self, id: &PackageId) -> Result<bool>;
    /// All packages, ordered by id.
    async fn get_all(&self) -> Result<Vec<Package>>;
}

#[async_trait]
pub trait LockerStore: Send + Sync {
    async fn store(&self, locker: Locker) -> Result<()>;
    async fn get(&self, id: &LockerId) -> Result<Option<Locker>>;
    /// All lockers, ordered by id.
    async fn get_all(&self) -> Result<Vec<Locker>>;
}

pub type PackageStoreBox = Box<dyn PackageStore>;
pub type LockerStoreBox = Box<dyn LockerStore>;

pub type PackageStoreFactory = Box<dyn Fn() -> PackageStoreBox + Send + Sync>;
pub type LockerStoreFactory = Box<dyn Fn() -> LockerStoreBox + Send + Sync>;
