//! Savings Token Common Library
//!
//! Shared types, constants, and utilities for the Savings Token ledger.
//!
//! ## Contents
//!
//! - **Constants**: Token metadata and deposit facility defaults
//! - **Errors**: Typed precondition failures with stable codes
//! - **Types**: Addresses, deposit records, operation results
//! - **Math**: Checked arithmetic and the stepped interest schedule
//! - **Events**: `Transfer`, `DepositMade`, `Withdrawal` and the event log
//! - **Config**: JSON-loadable genesis supply and interest schedule

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod events;
pub mod config;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use math::*;
pub use events::*;
pub use config::*;
