//! Core Types for the Savings Token Ledger
//!
//! Data structures shared by the ledger, the deposit engine and any host
//! that drives them.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for account addresses (opaque 32-byte identity)
pub type Address = [u8; 32];

/// Seconds on whatever timeline the host clock provides
pub type Timestamp = u64;

/// Short hex rendering of an address for logs and error messages
pub fn fmt_address(address: &Address) -> String {
    let mut out = String::with_capacity(10);
    out.push_str("0x");
    for byte in &address[..4] {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

// ============ Deposit Types ============

/// Deposit state of a single account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum DepositStatus {
    /// Nothing escrowed; a deposit may be opened
    #[default]
    NoDeposit,
    /// Funds escrowed; only a withdrawal is accepted
    Deposited,
}

/// An active escrow held against an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DepositRecord {
    /// Principal removed from the spendable balance
    pub amount: u64,
    /// Time the deposit was made
    pub start_time: Timestamp,
}

impl DepositRecord {
    pub fn new(amount: u64, start_time: Timestamp) -> Self {
        Self { amount, start_time }
    }

    /// Seconds elapsed since the deposit, zero if `now` precedes it
    pub fn elapsed(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.start_time)
    }
}

// ============ Operation Results ============

/// Outcome of a successful transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResult {
    /// Sender balance after the transfer
    pub from_balance: u64,
    /// Recipient balance after the transfer
    pub to_balance: u64,
    /// Amount moved
    pub amount: u64,
}

/// Outcome of a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalResult {
    /// Principal released from escrow
    pub principal: u64,
    /// Interest issued on top of the principal
    pub interest: u64,
    /// Spendable balance after the credit
    pub new_balance: u64,
}

impl WithdrawalResult {
    /// Total credited to the account
    pub fn total(&self) -> u64 {
        self.principal.saturating_add(self.interest)
    }
}
