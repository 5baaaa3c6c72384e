//! Domain model of the locker delivery service.
//!
//! Packages, lockers and riders are plain records. The package lifecycle is an
//! explicit transition table in [`lifecycle`]; every mutation of a package goes
//! through it, so an illegal transition is rejected before any field changes.

pub mod lifecycle;
pub mod locker;
pub mod money;
pub mod otp;
pub mod package;
pub mod ports;
pub mod rider;
