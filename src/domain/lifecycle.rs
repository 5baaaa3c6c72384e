//! Package lifecycle state machine.
//!
//! [`PackageStatus::next`] is the whole transition table. The `Package`
//! methods below look up the target state first and only then touch the
//! record, so a rejected action leaves the package exactly as it was.

use crate::domain::locker::LockerId;
use crate::domain::otp::{CodeGenerator, Otp};
use crate::domain::package::{AccessCodes, Package, PackageId, PackageStatus, RiderAssignment};
use crate::domain::rider::RiderId;
use crate::error::{DeliveryError, Result};
use std::fmt;

/// Everything an actor can do to an existing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Customer settles the service fee.
    Pay,
    /// Rider picks up the package and heads for the locker.
    AcceptJob,
    /// Customer redirects a door delivery into a locker.
    RequestLocker,
    /// Rider puts the package in a locker.
    MarkStored,
    /// Customer takes the package out of the locker.
    ConfirmReceipt,
    MarkDelivered,
    MarkFailed,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Pay,
        Action::AcceptJob,
        Action::RequestLocker,
        Action::MarkStored,
        Action::ConfirmReceipt,
        Action::MarkDelivered,
        Action::MarkFailed,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Pay => "pay for",
            Action::AcceptJob => "accept",
            Action::RequestLocker => "request a locker for",
            Action::MarkStored => "store",
            Action::ConfirmReceipt => "confirm receipt of",
            Action::MarkDelivered => "mark as delivered",
            Action::MarkFailed => "mark as failed",
        };
        f.write_str(label)
    }
}

impl PackageStatus {
    /// Target state of `action`, or `None` when the action is illegal here.
    ///
    /// `paid` only matters for retrieval: an unpaid package settles its fee on
    /// the way out and ends as `Retrieved & Paid`.
    pub fn next(self, action: Action, paid: bool) -> Option<PackageStatus> {
        use PackageStatus::*;

        match (self, action) {
            (LockerReserved, Action::Pay) => Some(PaidReadyForPickup),
            (PickedUpEnRoute | StoredInLocker, Action::Pay) => Some(self),
            (LockerReserved | PaidReadyForPickup | LockerRequested, Action::AcceptJob) => {
                Some(PickedUpEnRoute)
            }
            (OutForDelivery, Action::RequestLocker) => Some(LockerRequested),
            (PickedUpEnRoute, Action::MarkStored) => Some(StoredInLocker),
            (StoredInLocker, Action::ConfirmReceipt) if paid => Some(PackageRetrieved),
            (StoredInLocker, Action::ConfirmReceipt) => Some(RetrievedAndPaid),
            (status, Action::MarkDelivered) if status.is_active_rider_job() => Some(Delivered),
            (status, Action::MarkFailed) if status.is_active_rider_job() => Some(DeliveryFailed),
            _ => None,
        }
    }
}

impl Package {
    /// A fresh booking: the locker is reserved now, a rider is chosen, and the
    /// fee is still owed.
    pub fn book(
        id: PackageId,
        customer: impl Into<String>,
        recipient: Option<String>,
        description: Option<String>,
        rider: RiderId,
        locker: LockerId,
    ) -> Self {
        Self {
            id,
            customer: customer.into(),
            recipient: Some(recipient.unwrap_or_else(|| "Self".to_string())),
            description: Some(description.unwrap_or_else(|| "N/A".to_string())),
            status: PackageStatus::LockerReserved,
            rider: RiderAssignment::Assigned(rider),
            target_locker_id: Some(locker),
            locker_id: None,
            codes: AccessCodes::None,
            paid: false,
        }
    }

    /// Target state of `action` from the current state, or the reason it is
    /// not allowed.
    pub fn check(&self, action: Action) -> Result<PackageStatus> {
        self.status
            .next(action, self.paid)
            .ok_or_else(|| DeliveryError::InvalidTransition {
                package: self.id.clone(),
                status: self.status,
                action,
            })
    }

    pub fn pay(&mut self) -> Result<()> {
        if self.paid && !self.status.is_terminal() {
            return Err(DeliveryError::AlreadyPaid(self.id.clone()));
        }
        let next = self.check(Action::Pay)?;
        self.paid = true;
        self.status = next;
        Ok(())
    }

    /// Hands the job to `rider` and issues the code that opens the target
    /// locker.
    pub fn accept(&mut self, rider: RiderId, codes: &dyn CodeGenerator) -> Result<Otp> {
        let next = self.check(Action::AcceptJob)?;
        let code = codes.otp();
        self.status = next;
        self.rider = RiderAssignment::Assigned(rider);
        self.codes = AccessCodes::RiderAccess(code.clone());
        Ok(code)
    }

    pub fn request_locker(&mut self) -> Result<()> {
        let next = self.check(Action::RequestLocker)?;
        self.status = next;
        self.rider = RiderAssignment::Pending;
        Ok(())
    }

    /// Places the package in `locker`. The rider's code is replaced by the
    /// customer's retrieval code; `paid` carries over unchanged.
    pub fn store_in(&mut self, locker: LockerId, codes: &dyn CodeGenerator) -> Result<Otp> {
        let next = self.check(Action::MarkStored)?;
        let otp = codes.otp();
        self.status = next;
        self.locker_id = Some(locker);
        self.codes = AccessCodes::CustomerRetrieval(otp.clone());
        Ok(otp)
    }

    /// Checks `supplied` against the retrieval OTP and releases the package.
    ///
    /// Returns the locker that is now free.
    pub fn retrieve(&mut self, supplied: &str) -> Result<Option<LockerId>> {
        let next = self.check(Action::ConfirmReceipt)?;
        let Some(expected) = self.customer_retrieval_otp() else {
            return Err(DeliveryError::OtpNotReady(self.id.clone()));
        };
        if !expected.matches(supplied) {
            return Err(DeliveryError::IncorrectOtp(self.id.clone()));
        }

        let freed = self.locker_id.clone().or_else(|| self.target_locker_id.clone());
        self.status = next;
        self.paid = true;
        self.terminal_reset();
        Ok(freed)
    }

    pub fn deliver(&mut self) -> Result<()> {
        let next = self.check(Action::MarkDelivered)?;
        self.status = next;
        self.paid = true;
        self.terminal_reset();
        Ok(())
    }

    pub fn fail(&mut self) -> Result<()> {
        let next = self.check(Action::MarkFailed)?;
        self.status = next;
        self.paid = false;
        self.terminal_reset();
        Ok(())
    }

    fn terminal_reset(&mut self) {
        self.codes = AccessCodes::None;
        self.locker_id = None;
        self.target_locker_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::otp::SequentialCodeGenerator;
    use PackageStatus::*;

    fn booked() -> Package {
        Package::book(
            PackageId::new("PK0001"),
            "user_1",
            None,
            None,
            RiderId::new("Rider A"),
            LockerId::new("L-A01"),
        )
    }

    #[test]
    fn test_transition_table() {
        let table = [
            (LockerReserved, Action::Pay, Some(PaidReadyForPickup)),
            (PaidReadyForPickup, Action::Pay, None),
            (PickedUpEnRoute, Action::Pay, Some(PickedUpEnRoute)),
            (StoredInLocker, Action::Pay, Some(StoredInLocker)),
            (OutForDelivery, Action::Pay, None),
            (LockerReserved, Action::AcceptJob, Some(PickedUpEnRoute)),
            (PaidReadyForPickup, Action::AcceptJob, Some(PickedUpEnRoute)),
            (LockerRequested, Action::AcceptJob, Some(PickedUpEnRoute)),
            (OutForDelivery, Action::AcceptJob, None),
            (OutForDelivery, Action::RequestLocker, Some(LockerRequested)),
            (LockerReserved, Action::RequestLocker, None),
            (PickedUpEnRoute, Action::MarkStored, Some(StoredInLocker)),
            (LockerRequested, Action::MarkStored, None),
            (StoredInLocker, Action::MarkDelivered, None),
            (StoredInLocker, Action::MarkFailed, None),
            (OutForDelivery, Action::MarkDelivered, Some(Delivered)),
            (PickedUpEnRoute, Action::MarkFailed, Some(DeliveryFailed)),
        ];

        for (from, action, expected) in table {
            assert_eq!(from.next(action, false), expected, "{from} / {action}");
        }
    }

    #[test]
    fn test_retrieval_target_depends_on_payment() {
        assert_eq!(
            StoredInLocker.next(Action::ConfirmReceipt, true),
            Some(PackageRetrieved)
        );
        assert_eq!(
            StoredInLocker.next(Action::ConfirmReceipt, false),
            Some(RetrievedAndPaid)
        );
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for status in PackageStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for action in Action::ALL {
                assert_eq!(status.next(action, true), None);
                assert_eq!(status.next(action, false), None);
            }
        }
    }

    #[test]
    fn test_booking_defaults() {
        let package = booked();
        assert_eq!(package.status, LockerReserved);
        assert_eq!(package.recipient.as_deref(), Some("Self"));
        assert_eq!(package.description.as_deref(), Some("N/A"));
        assert!(!package.paid);
        assert_eq!(package.codes(), &AccessCodes::None);
    }

    #[test]
    fn test_full_locker_cycle() {
        let codes = SequentialCodeGenerator::new();
        let mut package = booked();

        package.pay().unwrap();
        assert_eq!(package.status, PaidReadyForPickup);

        let access = package.accept(RiderId::new("Rider B"), &codes).unwrap();
        assert_eq!(package.rider_locker_access_code(), Some(&access));
        assert!(package.rider.is_assigned_to(&RiderId::new("Rider B")));

        let otp = package.store_in(LockerId::new("L-A01"), &codes).unwrap();
        assert_eq!(package.status, StoredInLocker);
        assert!(package.rider_locker_access_code().is_none());
        assert!(package.paid);

        let freed = package.retrieve(otp.as_str()).unwrap();
        assert_eq!(freed, Some(LockerId::new("L-A01")));
        assert_eq!(package.status, PackageRetrieved);
        assert!(package.customer_retrieval_otp().is_none());
        assert!(package.locker_id.is_none());
    }

    #[test]
    fn test_unpaid_retrieval_settles_fee() {
        let codes = SequentialCodeGenerator::new();
        let mut package = booked();
        package.accept(RiderId::new("Rider A"), &codes).unwrap();
        let otp = package.store_in(LockerId::new("L-A01"), &codes).unwrap();
        assert!(!package.paid);

        package.retrieve(otp.as_str()).unwrap();
        assert_eq!(package.status, RetrievedAndPaid);
        assert!(package.paid);
    }

    #[test]
    fn test_wrong_otp_leaves_package_untouched() {
        let codes = SequentialCodeGenerator::new();
        let mut package = booked();
        package.accept(RiderId::new("Rider A"), &codes).unwrap();
        package.store_in(LockerId::new("L-A01"), &codes).unwrap();
        let before = package.clone();

        assert!(matches!(
            package.retrieve("000000"),
            Err(DeliveryError::IncorrectOtp(_))
        ));
        assert_eq!(package, before);
    }

    #[test]
    fn test_pay_twice_is_rejected() {
        let codes = SequentialCodeGenerator::new();
        let mut package = booked();
        package.pay().unwrap();
        package.accept(RiderId::new("Rider A"), &codes).unwrap();

        assert!(matches!(package.pay(), Err(DeliveryError::AlreadyPaid(_))));
    }

    #[test]
    fn test_delivered_and_failed_clear_codes() {
        let codes = SequentialCodeGenerator::new();

        let mut delivered = booked();
        delivered.accept(RiderId::new("Rider A"), &codes).unwrap();
        delivered.deliver().unwrap();
        assert_eq!(delivered.codes(), &AccessCodes::None);
        assert!(delivered.paid);

        let mut failed = booked();
        failed.pay().unwrap();
        failed.accept(RiderId::new("Rider A"), &codes).unwrap();
        failed.fail().unwrap();
        assert_eq!(failed.codes(), &AccessCodes::None);
        assert!(!failed.paid);
        assert_eq!(failed.locker_refs().count(), 0);
    }

    #[test]
    fn test_invalid_transition_reports_state() {
        let mut package = booked();
        let err = package.request_locker().unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::InvalidTransition {
                status: LockerReserved,
                action: Action::RequestLocker,
                ..
            }
        ));
        assert!(package.check(Action::MarkStored).is_err());
        assert_eq!(package.check(Action::AcceptJob).unwrap(), PickedUpEnRoute);
    }
}
