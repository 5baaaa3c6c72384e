use crate::domain::locker::{Locker, LockerId};
use crate::domain::package::{Package, PackageId};
use crate::domain::ports::{LockerStore, PackageStore};
use crate::error::{DeliveryError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing packages.
pub const CF_PACKAGES: &str = "packages";
/// Column Family for storing lockers.
pub const CF_LOCKERS: &str = "lockers";

/// A persistent store implementation using RocksDB.
///
/// Packages and lockers live in separate Column Families, keyed by their id
/// and stored as JSON. Keys are the raw id bytes, so iteration returns records
/// in id order like the in-memory stores.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("packages" and "lockers") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_packages = ColumnFamilyDescriptor::new(CF_PACKAGES, Options::default());
        let cf_lockers = ColumnFamilyDescriptor::new(CF_LOCKERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_packages, cf_lockers])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn column(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            DeliveryError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put_json<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.column(cf_name)?;
        let bytes =
            serde_json::to_vec(value).map_err(|e| DeliveryError::InternalError(Box::new(e)))?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.column(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| DeliveryError::InternalError(Box::new(e))),
            None => Ok(None),
        }
    }

    fn all_json<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.column(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let record = serde_json::from_slice(&value)
                .map_err(|e| DeliveryError::InternalError(Box::new(e)))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl PackageStore for RocksDBStore {
    async fn store(&self, package: Package) -> Result<()> {
        self.put_json(CF_PACKAGES, package.id.as_str().as_bytes(), &package)
    }

    async fn get(&self, id: &PackageId) -> Result<Option<Package>> {
        self.get_json(CF_PACKAGES, id.as_str().as_bytes())
    }

    async fn exists(&self, id: &PackageId) -> Result<bool> {
        let cf = self.column(CF_PACKAGES)?;
        // Just check if the key exists without deserializing the value
        let result = self.db.get_pinned_cf(cf, id.as_str().as_bytes())?;
        Ok(result.is_some())
    }

    async fn get_all(&self) -> Result<Vec<Package>> {
        self.all_json(CF_PACKAGES)
    }
}

#[async_trait]
impl LockerStore for RocksDBStore {
    async fn store(&self, locker: Locker) -> Result<()> {
        self.put_json(CF_LOCKERS, locker.id.as_str().as_bytes(), &locker)
    }

    async fn get(&self, id: &LockerId) -> Result<Option<Locker>> {
        self.get_json(CF_LOCKERS, id.as_str().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Locker>> {
        self.all_json(CF_LOCKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::otp::SequentialCodeGenerator;
    use crate::domain::rider::RiderId;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_PACKAGES).is_some());
        assert!(store.db.cf_handle(CF_LOCKERS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_package_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        let codes = SequentialCodeGenerator::new();

        let mut package = Package::book(
            PackageId::new("PK0001"),
            "user_1",
            None,
            None,
            RiderId::new("Rider A"),
            LockerId::new("L-A01"),
        );
        package.accept(RiderId::new("Rider A"), &codes).unwrap();

        PackageStore::store(&store, package.clone()).await.unwrap();

        let retrieved = PackageStore::get(&store, &package.id).await.unwrap().unwrap();
        assert_eq!(retrieved, package);
        assert!(retrieved.rider_locker_access_code().is_some());

        assert!(store.exists(&package.id).await.unwrap());
        assert!(!store.exists(&PackageId::new("PK0002")).await.unwrap());
        assert_eq!(PackageStore::get_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rocksdb_locker_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let locker = Locker::new("L-C01", "Central Library");
        LockerStore::store(&store, locker.clone()).await.unwrap();

        let retrieved = LockerStore::get(&store, &locker.id).await.unwrap().unwrap();
        assert_eq!(retrieved, locker);

        let all = LockerStore::get_all(&store).await.unwrap();
        assert_eq!(all, vec![locker]);

        assert!(
            LockerStore::get(&store, &LockerId::new("L-Z99"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
