//! Ledger Constants
//!
//! Token metadata and the default parameters of the deposit facility.
//! Runtime overrides go through [`crate::config::TokenConfig`]; these values
//! are its defaults.

use crate::types::Address;

/// Token Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Savings Token";
    /// Token symbol
    pub const SYMBOL: &str = "SVT";
    /// Decimal places (balances are whole units)
    pub const DECIMALS: u8 = 0;
    /// Supply minted to the owner at genesis
    pub const INITIAL_SUPPLY: u64 = 1_000_000;
}

/// Deposit facility parameters
pub mod interest {
    /// Interest earned per complete period, in percent of principal
    pub const RATE_PERCENT: u64 = 2;

    /// Length of one accrual period (5 minutes)
    pub const PERIOD_SECONDS: u64 = 300;

    /// Upper bound accepted for a configured per-period rate
    pub const MAX_RATE_PERCENT: u64 = 100;
}

/// Precision constants
pub mod precision {
    /// Percentage precision (100 = 100%)
    pub const PERCENT_PRECISION: u64 = 100;
}

/// Sender of the genesis `Transfer` event
pub const NULL_ADDRESS: Address = [0u8; 32];

/// Account holding all escrowed deposit principal
///
/// Reserved: it never sends or receives ordinary transfers, so its balance
/// always equals the sum of active deposit amounts.
pub const ESCROW_ADDRESS: Address = [0xffu8; 32];
