//! Demo data: the courier roster, five campus lockers and a handful of
//! packages spread over the lifecycle.
//!
//! Seed packages are driven through the real transitions rather than written
//! field by field, so they always satisfy the package invariants.

use crate::domain::locker::{Locker, LockerId};
use crate::domain::otp::CodeGenerator;
use crate::domain::package::{Package, PackageId};
use crate::domain::ports::{LockerStore, PackageStore};
use crate::domain::rider::{Rider, RiderId, RiderRoster};
use crate::error::Result;

pub const SEED_CUSTOMER: &str = "user_customer_sim";

pub fn riders() -> RiderRoster {
    RiderRoster::new(vec![
        Rider::new("Rider A", "Rider A"),
        Rider::new("Rider B", "Rider B"),
        Rider::new("Rider C", "Rider C"),
    ])
}

pub fn lockers() -> Vec<Locker> {
    vec![
        Locker::new("L-A01", "North Campus"),
        Locker::new("L-A02", "North Campus"),
        Locker::new("L-B01", "South Campus"),
        Locker::new("L-C01", "Central Library"),
        Locker::new("L-C02", "Central Library"),
    ]
}

fn booking(id: &str, recipient: &str, description: &str, rider: &str, locker: &str) -> Package {
    Package::book(
        PackageId::new(id),
        SEED_CUSTOMER,
        Some(recipient.to_string()),
        Some(description.to_string()),
        RiderId::new(rider),
        LockerId::new(locker),
    )
}

pub fn packages(codes: &dyn CodeGenerator) -> Result<Vec<Package>> {
    // Reserved, fee still owed
    let reserved = booking("PK001", "Alice", "Books", "Rider A", "L-A01");

    let mut paid = booking("PK002", "Bob", "Clothes", "Rider B", "L-A02");
    paid.pay()?;

    let mut stored = booking("PK003", "Charlie", "Gadget", "Rider C", "L-C01");
    stored.pay()?;
    stored.accept(RiderId::new("Rider C"), codes)?;
    stored.store_in(LockerId::new("L-C01"), codes)?;

    // Paid on the way out of the locker
    let mut retrieved = booking("PK004", "Diana", "Documents", "Rider A", "L-B01");
    retrieved.accept(RiderId::new("Rider A"), codes)?;
    let otp = retrieved.store_in(LockerId::new("L-B01"), codes)?;
    retrieved.retrieve(otp.as_str())?;

    let mut door = Package::dispatched(PackageId::new("PK005"), SEED_CUSTOMER, RiderId::new("Rider B"));
    door.recipient = Some("Eve".to_string());
    door.description = Some("Groceries".to_string());

    Ok(vec![reserved, paid, stored, retrieved, door])
}

/// Installs the campus locker inventory into an empty store.
///
/// Returns whether anything was written.
pub async fn populate_lockers(locker_store: &dyn LockerStore) -> Result<bool> {
    if !locker_store.get_all().await?.is_empty() {
        return Ok(false);
    }
    for locker in lockers() {
        locker_store.store(locker).await?;
    }
    Ok(true)
}

/// Loads the demo packages, but only into an empty store.
pub async fn populate_packages(
    package_store: &dyn PackageStore,
    codes: &dyn CodeGenerator,
) -> Result<bool> {
    if !package_store.get_all().await?.is_empty() {
        return Ok(false);
    }
    for package in packages(codes)? {
        package_store.store(package).await?;
    }
    Ok(true)
}

/// Lockers and demo packages together.
pub async fn populate(
    package_store: &dyn PackageStore,
    locker_store: &dyn LockerStore,
    codes: &dyn CodeGenerator,
) -> Result<bool> {
    let lockers = populate_lockers(locker_store).await?;
    let packages = populate_packages(package_store, codes).await?;
    Ok(lockers || packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::locker::occupied_lockers;
    use crate::domain::otp::SequentialCodeGenerator;
    use crate::domain::package::PackageStatus;
    use crate::infrastructure::in_memory::{InMemoryLockerStore, InMemoryPackageStore};

    #[test]
    fn test_seed_packages_cover_lifecycle() {
        let packages = packages(&SequentialCodeGenerator::new()).unwrap();
        let statuses: Vec<PackageStatus> = packages.iter().map(|p| p.status).collect();

        assert_eq!(
            statuses,
            vec![
                PackageStatus::LockerReserved,
                PackageStatus::PaidReadyForPickup,
                PackageStatus::StoredInLocker,
                PackageStatus::RetrievedAndPaid,
                PackageStatus::OutForDelivery,
            ]
        );
        assert!(packages[2].customer_retrieval_otp().is_some());
        assert!(packages[3].paid);
    }

    #[test]
    fn test_seed_occupancy() {
        let packages = packages(&SequentialCodeGenerator::new()).unwrap();
        let occupied = occupied_lockers(&packages);

        for id in ["L-A01", "L-A02", "L-C01"] {
            assert!(occupied.contains(&LockerId::new(id)), "{id} should be occupied");
        }
        assert!(!occupied.contains(&LockerId::new("L-B01")));
        assert!(!occupied.contains(&LockerId::new("L-C02")));
    }

    #[tokio::test]
    async fn test_populate_only_once() {
        let package_store = InMemoryPackageStore::new();
        let locker_store = InMemoryLockerStore::new();
        let codes = SequentialCodeGenerator::new();

        assert!(populate(&package_store, &locker_store, &codes).await.unwrap());
        assert!(!populate(&package_store, &locker_store, &codes).await.unwrap());

        assert_eq!(package_store.get_all().await.unwrap().len(), 5);
        assert_eq!(locker_store.get_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_lockers_without_packages() {
        let package_store = InMemoryPackageStore::new();
        let locker_store = InMemoryLockerStore::new();

        assert!(populate_lockers(&locker_store).await.unwrap());
        assert!(!populate_lockers(&locker_store).await.unwrap());

        assert!(package_store.get_all().await.unwrap().is_empty());
        assert_eq!(locker_store.get_all().await.unwrap().len(), 5);
    }
}
