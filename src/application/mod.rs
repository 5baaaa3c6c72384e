//! Application layer containing the package lifecycle orchestration.
//!
//! [`engine::LifecycleEngine`] is the entry point for every customer, rider
//! and admin action. It validates each action against the package state
//! machine and the locker inventory, then persists the result through the
//! repository ports. Notices and reports are plain values built from the
//! stored records.

pub mod engine;
pub mod notice;
pub mod report;
