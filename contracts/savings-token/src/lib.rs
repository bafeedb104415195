//! Savings Token
//!
//! Fungible token ledger with an interest-bearing deposit facility.
//!
//! The whole supply is minted to an owner at genesis. Accounts transfer
//! balances to one another and may escrow one deposit at a time, which
//! accrues a fixed percentage of principal per complete period and is paid
//! out on withdrawal.
//!
//! ## Layout
//!
//! - [`ledger`]: balances, owner, supply counters
//! - [`deposits`]: per-account escrow state machine
//! - [`state`]: both combined, with events, invariant checks and snapshots
//! - [`processor`]: mutex-serialized front for concurrent callers
//! - [`clock`]: injected time sources

pub mod clock;
pub mod deposits;
pub mod ledger;
pub mod processor;
pub mod state;


pub use clock::{Clock, ManualClock, SystemClock};
pub use deposits::DepositEngine;
pub use ledger::Ledger;
pub use processor::{Command, CommandOutcome, TokenProcessor};
pub use state::{AccountSnapshot, StateSnapshot, TokenState};

pub use savings_common::{
    config::{ConfigError, InterestSchedule, TokenConfig},
    errors::{LedgerError, LedgerResult},
    events::{EventLog, LedgerEvent},
    types::{Address, DepositRecord, DepositStatus, Timestamp, TransferResult, WithdrawalResult},
};
