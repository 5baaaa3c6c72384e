use crate::error::DeliveryError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A non-negative monetary value.
///
/// Wraps `rust_decimal::Decimal` so fee arithmetic stays exact.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, DeliveryError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(DeliveryError::ValidationError(
                "Amount must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `count` times this amount, or `None` when the product does not fit.
    pub fn checked_times(self, count: usize) -> Option<Self> {
        self.0.checked_mul(Decimal::from(count)).map(Self)
    }

    /// The portion of this amount selected by `rate`.
    pub fn share(self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}


/// Fraction of revenue kept by the platform, between 0 and 1 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    pub fn new(value: Decimal) -> Result<Self, DeliveryError> {
        if (Decimal::ZERO..=Decimal::ONE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DeliveryError::ValidationError(
                "Commission rate must be between 0 and 1".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// What is left for the rider.
    pub fn rider_rate(&self) -> Decimal {
        Decimal::ONE - self.0
    }
}

/// Admin-configurable pricing, held in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub service_fee: Money,
    pub commission_rate: CommissionRate,
}

impl FeeSchedule {
    pub fn new(service_fee: Decimal, commission_rate: Decimal) -> Result<Self, DeliveryError> {
        Ok(Self {
            service_fee: Money::new(service_fee)?,
            commission_rate: CommissionRate::new(commission_rate)?,
        })
    }

    /// Revenue collected for `count` paid packages.
    pub fn revenue(&self, count: usize) -> Result<Money, DeliveryError> {
        self.service_fee.checked_times(count).ok_or_else(|| {
            DeliveryError::ValidationError(format!(
                "Revenue for {count} packages at a fee of {} is out of range",
                self.service_fee.value()
            ))
        })
    }

    pub fn platform_share(&self, revenue: Money) -> Money {
        revenue.share(self.commission_rate.value())
    }

    pub fn rider_share(&self, revenue: Money) -> Money {
        revenue.share(self.commission_rate.rider_rate())
    }
}

impl Default for FeeSchedule {
    /// 2.50 per package with a 15% platform commission.
    fn default() -> Self {
        Self {
            service_fee: Money(Decimal::new(250, 2)),
            commission_rate: CommissionRate(Decimal::new(15, 2)),
        }
    }
}
