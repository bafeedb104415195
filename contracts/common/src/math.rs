//! Mathematical Utilities for the Savings Token Ledger
//!
//! Checked balance arithmetic and the stepped interest schedule.

use crate::constants::precision;
use crate::errors::{LedgerError, LedgerResult};

/// Number of complete accrual periods in `elapsed_seconds`
///
/// Partial periods are truncated.
pub fn complete_periods(elapsed_seconds: u64, period_seconds: u64) -> LedgerResult<u64> {
    if period_seconds == 0 {
        return Err(LedgerError::InvalidParameter {
            param: "period_seconds",
            reason: "must be non-zero",
        });
    }
    Ok(elapsed_seconds / period_seconds)
}

/// Calculate simple stepped interest
///
/// interest = floor(principal * rate_percent * periods / 100)
/// where periods = floor(elapsed_seconds / period_seconds)
///
/// # Arguments
/// * `principal` - Deposited amount
/// * `elapsed_seconds` - Time the deposit has been held
/// * `rate_percent` - Percent of principal earned per complete period
/// * `period_seconds` - Length of one period
///
/// # Returns
/// Interest in base units. Nothing compounds; the result depends only on
/// the four inputs.
pub fn interest_for(
    principal: u64,
    elapsed_seconds: u64,
    rate_percent: u64,
    period_seconds: u64,
) -> LedgerResult<u64> {
    let periods = complete_periods(elapsed_seconds, period_seconds)?;
    if periods == 0 || principal == 0 || rate_percent == 0 {
        return Ok(0);
    }

    let interest = (principal as u128)
        .checked_mul(rate_percent as u128)
        .ok_or(LedgerError::ArithmeticOverflow)?
        .checked_mul(periods as u128)
        .ok_or(LedgerError::ArithmeticOverflow)?
        / precision::PERCENT_PRECISION as u128;

    u64::try_from(interest).map_err(|_| LedgerError::ArithmeticOverflow)
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> LedgerResult<u64> {
    a.checked_add(b).ok_or(LedgerError::ArithmeticOverflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u64, b: u64) -> LedgerResult<u64> {
    a.checked_sub(b).ok_or(LedgerError::ArithmeticOverflow)
}
