//! Serializing command processor
//!
//! Hosts with many callers share one [`TokenProcessor`]. It owns the
//! [`TokenState`] behind a single mutex and reads the injected [`Clock`]
//! while holding it, so commands apply one at a time and their timestamps
//! follow the order they were applied in.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use savings_common::{
    errors::LedgerResult,
    events::LedgerEvent,
    types::{Address, DepositRecord, TransferResult, WithdrawalResult},
};

use crate::clock::Clock;
use crate::state::{StateSnapshot, TokenState};

/// A state transition requested by an external caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },
    Deposit {
        account: Address,
        amount: u64,
    },
    Withdraw {
        account: Address,
    },
}

/// Result of an applied [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Transferred(TransferResult),
    Deposited(DepositRecord),
    Withdrawn(WithdrawalResult),
}

/// Thread-safe front for a [`TokenState`]
pub struct TokenProcessor {
    state: Mutex<TokenState>,
    clock: Arc<dyn Clock>,
}

impl TokenProcessor {
    pub fn new(state: TokenState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(state),
            clock,
        }
    }

    /// Apply one command atomically
    pub fn apply(&self, command: Command) -> LedgerResult<CommandOutcome> {
        let mut state = self.state.lock();
        let now = self.clock.now();
        match command {
            Command::Transfer { from, to, amount } => state
                .transfer(from, to, amount)
                .map(CommandOutcome::Transferred),
            Command::Deposit { account, amount } => state
                .deposit(account, amount, now)
                .map(CommandOutcome::Deposited),
            Command::Withdraw { account } => {
                state.withdraw(account, now).map(CommandOutcome::Withdrawn)
            }
        }
    }

    /// `caller` sends `amount` to `to`
    pub fn transfer(&self, caller: Address, to: Address, amount: u64) -> LedgerResult<TransferResult> {
        self.state.lock().transfer(caller, to, amount)
    }

    /// `caller` escrows `amount` at the current clock time
    pub fn deposit(&self, caller: Address, amount: u64) -> LedgerResult<DepositRecord> {
        let mut state = self.state.lock();
        let now = self.clock.now();
        state.deposit(caller, amount, now)
    }

    /// `caller` reclaims their escrow with interest up to the current clock time
    pub fn withdraw(&self, caller: Address) -> LedgerResult<WithdrawalResult> {
        let mut state = self.state.lock();
        let now = self.clock.now();
        state.withdraw(caller, now)
    }

    pub fn balance_of(&self, account: &Address) -> u64 {
        self.state.lock().balance_of(account)
    }

    pub fn deposit_of(&self, account: &Address) -> Option<DepositRecord> {
        self.state.lock().deposit_of(account)
    }

    pub fn total_supply(&self) -> u64 {
        self.state.lock().total_supply()
    }

    pub fn owner(&self) -> Address {
        self.state.lock().owner()
    }

    pub fn pending_interest(&self, account: &Address) -> LedgerResult<u64> {
        let state = self.state.lock();
        state.pending_interest(account, self.clock.now())
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.lock().snapshot()
    }

    pub fn check_invariants(&self) -> LedgerResult<()> {
        self.state.lock().check_invariants()
    }

    /// Events emitted since the last drain
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        self.state.lock().drain_events()
    }

    /// Run `f` against a consistent view of the state
    pub fn with_state<R>(&self, f: impl FnOnce(&TokenState) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn into_state(self) -> TokenState {
        self.state.into_inner()
    }
}
