//! Error Types for the Savings Token Ledger
//!
//! Every failure is a precondition violation the caller can correct; a
//! failed operation never changes ledger state.

use crate::types::{fmt_address, Address};

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Main error enum for all ledger and deposit errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    // ============ Balance Errors ============
    /// Transfer or deposit amount exceeds the spendable balance
    #[error("Not enough tokens: available {available}, requested {requested}")]
    InsufficientBalance { available: u64, requested: u64 },

    /// Zero amount not allowed
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Ordinary transfers and deposits may not touch the escrow account
    #[error("reserved account {}", fmt_address(.account))]
    ReservedAccount { account: Address },

    // ============ Deposit Errors ============
    /// Account already has an escrowed deposit
    #[error("deposit already active for {}", fmt_address(.account))]
    DepositAlreadyActive { account: Address },

    /// Account has nothing escrowed
    #[error("No active deposit for {}", fmt_address(.account))]
    NoActiveDeposit { account: Address },

    // ============ Math Errors ============
    /// Balance, supply or interest computation exceeds u64
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    // ============ Input Validation Errors ============
    /// Invalid input parameter
    #[error("invalid parameter `{param}`: {reason}")]
    InvalidParameter {
        param: &'static str,
        reason: &'static str,
    },

    // ============ State Errors ============
    /// A ledger invariant does not hold
    #[error("ledger invariant violated: {reason}")]
    InvariantViolated { reason: &'static str },
}

impl LedgerError {
    /// Returns a stable error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "E011_INSUFFICIENT_BALANCE",
            Self::ZeroAmount => "E014_ZERO_AMOUNT",
            Self::ReservedAccount { .. } => "E015_RESERVED_ACCOUNT",
            Self::DepositAlreadyActive { .. } => "E050_DEPOSIT_ACTIVE",
            Self::NoActiveDeposit { .. } => "E051_NO_ACTIVE_DEPOSIT",
            Self::ArithmeticOverflow => "E080_OVERFLOW",
            Self::InvalidParameter { .. } => "E090_INVALID_PARAM",
            Self::InvariantViolated { .. } => "E101_INVARIANT",
        }
    }

    /// Returns true if the caller can retry with corrected inputs
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            LedgerError::InsufficientBalance {
                available: 1,
                requested: 2,
            },
            LedgerError::ZeroAmount,
            LedgerError::ReservedAccount { account: [0xff; 32] },
            LedgerError::DepositAlreadyActive { account: [1u8; 32] },
            LedgerError::NoActiveDeposit { account: [1u8; 32] },
            LedgerError::ArithmeticOverflow,
            LedgerError::InvalidParameter {
                param: "period_seconds",
                reason: "must be non-zero",
            },
            LedgerError::InvariantViolated { reason: "supply" },
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_display_includes_context() {
        let err = LedgerError::InsufficientBalance {
            available: 5,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Not enough tokens: available 5, requested 10"
        );

        let err = LedgerError::NoActiveDeposit { account: [0xab; 32] };
        assert!(err.to_string().starts_with("No active deposit for 0xabababab"));
    }

    #[test]
    fn test_display_heads_match_revert_reasons() {
        let short = LedgerError::InsufficientBalance {
            available: 0,
            requested: 1,
        };
        assert!(short.to_string().starts_with("Not enough tokens"));
        assert!(LedgerError::NoActiveDeposit { account: [1u8; 32] }
            .to_string()
            .starts_with("No active deposit"));
    }

    #[test]
    fn test_precondition_errors_are_recoverable() {
        assert!(LedgerError::ArithmeticOverflow.is_recoverable());
        assert!(LedgerError::NoActiveDeposit { account: [0u8; 32] }.is_recoverable());
        assert!(!LedgerError::InvariantViolated { reason: "x" }.is_recoverable());
    }
}
