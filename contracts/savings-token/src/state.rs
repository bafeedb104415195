//! Token State
//!
//! The ledger and the deposit engine combined into one owned state object.
//! Every operation is all-or-nothing: on success it appends exactly one
//! event to the log, on failure the state and the log are unchanged.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use savings_common::{
    config::{ConfigError, InterestSchedule, TokenConfig},
    constants::{token, ESCROW_ADDRESS, NULL_ADDRESS},
    errors::{LedgerError, LedgerResult},
    events::{EventLog, LedgerEvent},
    types::{fmt_address, Address, DepositRecord, DepositStatus, Timestamp, TransferResult, WithdrawalResult},
};

use crate::deposits::DepositEngine;
use crate::ledger::Ledger;

// ============ Snapshot ============

/// One account's balance and escrow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AccountSnapshot {
    pub address: Address,
    pub balance: u64,
    pub deposit: Option<DepositRecord>,
}

/// Canonical copy of the ledger tables, ordered by address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StateSnapshot {
    pub owner: Address,
    pub genesis_supply: u64,
    pub total_supply: u64,
    pub accounts: Vec<AccountSnapshot>,
}

impl StateSnapshot {
    /// SHA-256 over the borsh encoding
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"savings-state");
        hasher.update(borsh::to_vec(self).unwrap_or_default());
        hasher.finalize().into()
    }
}

// ============ Token State ============

/// Ledger, deposit engine and event log
#[derive(Debug, Clone)]
pub struct TokenState {
    ledger: Ledger,
    deposits: DepositEngine,
    events: EventLog,
}

impl TokenState {
    /// Genesis with the default supply and interest schedule
    pub fn with_defaults(owner: Address) -> Self {
        Self::build(owner, token::INITIAL_SUPPLY, InterestSchedule::default())
    }

    /// Genesis from a configuration
    ///
    /// The whole initial supply goes to `owner`, recorded as a transfer from
    /// the null address. The escrow account cannot be the owner.
    pub fn genesis(owner: Address, config: &TokenConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if owner == ESCROW_ADDRESS {
            return Err(ConfigError::InvalidValue(
                "owner cannot be the escrow account".to_string(),
            ));
        }
        Ok(Self::build(owner, config.initial_supply, config.interest))
    }

    fn build(owner: Address, supply: u64, schedule: InterestSchedule) -> Self {
        let mut events = EventLog::new();
        events.emit(LedgerEvent::Transfer {
            from: NULL_ADDRESS,
            to: owner,
            amount: supply,
        });
        info!(
            owner = %fmt_address(&owner),
            supply,
            rate_percent = schedule.rate_percent,
            period_seconds = schedule.period_seconds,
            "genesis"
        );

        Self {
            ledger: Ledger::genesis(owner, supply),
            deposits: DepositEngine::new(schedule),
            events,
        }
    }

    // ============ Queries ============

    pub fn name(&self) -> &'static str {
        token::NAME
    }

    pub fn symbol(&self) -> &'static str {
        token::SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        token::DECIMALS
    }

    pub fn owner(&self) -> Address {
        self.ledger.owner()
    }

    pub fn total_supply(&self) -> u64 {
        self.ledger.total_supply()
    }

    pub fn genesis_supply(&self) -> u64 {
        self.ledger.genesis_supply()
    }

    pub fn balance_of(&self, account: &Address) -> u64 {
        self.ledger.balance_of(account)
    }

    pub fn deposit_of(&self, account: &Address) -> Option<DepositRecord> {
        self.deposits.deposit_of(account)
    }

    pub fn deposit_status(&self, account: &Address) -> DepositStatus {
        self.deposits.status(account)
    }

    pub fn interest_schedule(&self) -> &InterestSchedule {
        self.deposits.schedule()
    }

    /// Interest `account` would receive by withdrawing at `now`
    pub fn pending_interest(&self, account: &Address, now: Timestamp) -> LedgerResult<u64> {
        self.deposits.pending_interest(account, now)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand the accumulated events to the caller
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    // ============ Operations ============

    /// Move `amount` from `from` to `to`
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u64,
    ) -> LedgerResult<TransferResult> {
        let result = self
            .ledger
            .transfer(&from, &to, amount)
            .map_err(|err| rejected("transfer", &from, err))?;

        self.events.emit(LedgerEvent::Transfer { from, to, amount });
        debug!(
            from = %fmt_address(&from),
            to = %fmt_address(&to),
            amount,
            "transfer applied"
        );
        Ok(result)
    }

    /// Escrow `amount` of `account`'s balance, starting accrual at `now`
    pub fn deposit(
        &mut self,
        account: Address,
        amount: u64,
        now: Timestamp,
    ) -> LedgerResult<DepositRecord> {
        let record = self
            .deposits
            .deposit(&mut self.ledger, &account, amount, now)
            .map_err(|err| rejected("deposit", &account, err))?;

        self.events.emit(LedgerEvent::DepositMade { account, amount });
        debug!(account = %fmt_address(&account), amount, start_time = now, "deposit applied");
        Ok(record)
    }

    /// Return `account`'s escrow plus the interest accrued by `now`
    pub fn withdraw(&mut self, account: Address, now: Timestamp) -> LedgerResult<WithdrawalResult> {
        let result = self
            .deposits
            .withdraw(&mut self.ledger, &account, now)
            .map_err(|err| rejected("withdraw", &account, err))?;

        self.events.emit(LedgerEvent::Withdrawal {
            account,
            principal: result.principal,
            interest: result.interest,
        });
        debug!(
            account = %fmt_address(&account),
            principal = result.principal,
            interest = result.interest,
            "withdrawal applied"
        );
        Ok(result)
    }

    // ============ Invariants ============

    /// Verify supply conservation
    ///
    /// The sum of every balance equals the total supply, the escrow account
    /// holds exactly the principal of the active deposits, and the total
    /// supply never drops below the genesis supply.
    pub fn check_invariants(&self) -> LedgerResult<()> {
        let sum = self.ledger.balance_sum().ok_or(LedgerError::InvariantViolated {
            reason: "balance sum overflows",
        })?;
        if sum != self.ledger.total_supply() {
            return Err(LedgerError::InvariantViolated {
                reason: "sum of balances differs from total supply",
            });
        }

        let principal = self.deposits.total_escrowed().ok_or(LedgerError::InvariantViolated {
            reason: "deposit principal sum overflows",
        })?;
        if principal != self.ledger.escrowed() {
            return Err(LedgerError::InvariantViolated {
                reason: "escrow balance differs from deposit principal",
            });
        }

        if self.ledger.total_supply() < self.ledger.genesis_supply() {
            return Err(LedgerError::InvariantViolated {
                reason: "total supply below genesis supply",
            });
        }
        if self.deposits.records().any(|(_, record)| record.amount == 0) {
            return Err(LedgerError::InvariantViolated {
                reason: "deposit record without escrowed funds",
            });
        }
        Ok(())
    }

    /// Canonical copy of balances and deposits
    pub fn snapshot(&self) -> StateSnapshot {
        let mut accounts: Vec<AccountSnapshot> = self
            .ledger
            .accounts()
            .map(|(address, balance)| AccountSnapshot {
                address: *address,
                balance: *balance,
                deposit: self.deposits.deposit_of(address),
            })
            .collect();

        // Accounts whose whole balance is escrowed
        for (address, record) in self.deposits.records() {
            if self.ledger.balance_of(address) == 0 {
                accounts.push(AccountSnapshot {
                    address: *address,
                    balance: 0,
                    deposit: Some(*record),
                });
            }
        }
        accounts.sort_by(|a, b| a.address.cmp(&b.address));

        StateSnapshot {
            owner: self.ledger.owner(),
            genesis_supply: self.ledger.genesis_supply(),
            total_supply: self.ledger.total_supply(),
            accounts,
        }
    }

    /// Digest of [`Self::snapshot`]; equal digests mean equal tables
    pub fn state_digest(&self) -> [u8; 32] {
        self.snapshot().digest()
    }
}

fn rejected(operation: &'static str, account: &Address, err: LedgerError) -> LedgerError {
    warn!(
        operation,
        account = %fmt_address(account),
        code = err.code(),
        "{}",
        err
    );
    err
}
