//! Ledger Events
//!
//! Events are emitted by every successful state transition so that an
//! external caller can follow balances and audit interest without reading
//! the tables directly.

use serde::{Deserialize, Serialize};
use crate::types::Address;

/// Event emitted by a successful ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// Emitted on every transfer, including the genesis allocation
    /// from [`crate::constants::NULL_ADDRESS`] to the owner
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },

    /// Emitted when funds are escrowed
    DepositMade {
        account: Address,
        amount: u64,
    },

    /// Emitted when escrow is released; principal and interest stay separate
    Withdrawal {
        account: Address,
        principal: u64,
        interest: u64,
    },
}

/// Events in emission order, until the caller drains them
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every event recorded so far, leaving the log empty
    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}
