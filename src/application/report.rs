use crate::domain::locker::{LockerStatus, LockerView};
use crate::domain::money::{FeeSchedule, Money};
use crate::domain::package::{Package, PackageStatus};
use crate::domain::rider::RiderId;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;

/// Point-in-time figures for the admin dashboard. Nothing here is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminReport {
    pub service_fee: Decimal,
    pub commission_rate: Decimal,
    pub paid_packages: usize,
    pub total_revenue: Decimal,
    pub platform_earnings: Decimal,
    pub rider_payouts: Decimal,
    pub packages_handled: usize,
    pub occupied_lockers: usize,
    pub total_lockers: usize,
    pub locker_utilization: Decimal,
}

impl AdminReport {
    /// Fails when the fee times the number of paid packages is out of range.
    pub fn compute(
        packages: &[Package],
        lockers: &[LockerView],
        fees: &FeeSchedule,
    ) -> Result<Self> {
        let paid_packages = packages.iter().filter(|p| p.paid).count();
        let revenue = fees.revenue(paid_packages)?;

        let packages_handled = packages
            .iter()
            .filter(|p| {
                matches!(
                    p.status,
                    PackageStatus::Delivered
                        | PackageStatus::StoredInLocker
                        | PackageStatus::RetrievedAndPaid
                        | PackageStatus::PackageRetrieved
                )
            })
            .count();

        let occupied_lockers = lockers
            .iter()
            .filter(|l| l.status == LockerStatus::Occupied)
            .count();
        let locker_utilization = if lockers.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(occupied_lockers) / Decimal::from(lockers.len())
        };

        Ok(Self {
            service_fee: fees.service_fee.value(),
            commission_rate: fees.commission_rate.value(),
            paid_packages,
            total_revenue: revenue.value(),
            platform_earnings: fees.platform_share(revenue).value(),
            rider_payouts: fees.rider_share(revenue).value(),
            packages_handled,
            occupied_lockers,
            total_lockers: lockers.len(),
            locker_utilization,
        })
    }
}

/// The rider's cut of the jobs they completed: door deliveries and locker
/// parcels collected with payment.
pub fn rider_earnings(
    packages: &[Package],
    rider: &RiderId,
    fees: &FeeSchedule,
) -> Result<Money> {
    let completed = packages
        .iter()
        .filter(|p| p.rider.is_assigned_to(rider))
        .filter(|p| {
            matches!(
                p.status,
                PackageStatus::Delivered | PackageStatus::RetrievedAndPaid
            )
        })
        .count();
    Ok(fees.rider_share(fees.revenue(completed)?))
}
