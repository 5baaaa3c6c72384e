use crate::domain::locker::{Locker, LockerId};
use crate::domain::package::{Package, PackageId};
use crate::domain::ports::{LockerStore, PackageStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for packages.
///
/// Clones share the same map, so a caller can keep a handle after passing the
/// store to the engine.
#[derive(Default, Clone)]
pub struct InMemoryPackageStore {
    packages: Arc<RwLock<BTreeMap<PackageId, Package>>>,
}

impl InMemoryPackageStore {
    /// Creates a new, empty in-memory package store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PackageStore for InMemoryPackageStore {
    async fn store(&self, package: Package) -> Result<()> {
        let mut packages = self.packages.write().await;
        packages.insert(package.id.clone(), package);
        Ok(())
    }

    async fn get(&self, id: &PackageId) -> Result<Option<Package>> {
        let packages = self.packages.read().await;
        Ok(packages.get(id).cloned())
    }

    async fn exists(&self, id: &PackageId) -> Result<bool> {
        let packages = self.packages.read().await;
        Ok(packages.contains_key(id))
    }

    async fn get_all(&self) -> Result<Vec<Package>> {
        let packages = self.packages.read().await;
        Ok(packages.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for lockers.
#[derive(Default, Clone)]
pub struct InMemoryLockerStore {
    lockers: Arc<RwLock<BTreeMap<LockerId, Locker>>>,
}

impl InMemoryLockerStore {
    /// Creates a new, empty in-memory locker store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockerStore for InMemoryLockerStore {
    async fn store(&self, locker: Locker) -> Result<()> {
        let mut lockers = self.lockers.write().await;
        lockers.insert(locker.id.clone(), locker);
        Ok(())
    }

    async fn get(&self, id: &LockerId) -> Result<Option<Locker>> {
        let lockers = self.lockers.read().await;
        Ok(lockers.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Locker>> {
        let lockers = self.lockers.read().await;
        Ok(lockers.values().cloned().collect())
    }
}
