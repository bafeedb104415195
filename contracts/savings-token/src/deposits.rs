//! Deposit Engine
//!
//! Each account is either `NoDeposit` or `Deposited`. A deposit moves funds
//! from the account to the ledger's escrow account and records when that
//! happened; a withdrawal moves the principal back together with stepped
//! interest and clears the record.
//!
//! The engine only mutates through [`crate::state::TokenState`], which pairs
//! it with the one ledger its records were escrowed against.
//!
//! | State     | Operation | Next      | Failure              |
//! |-----------|-----------|-----------|----------------------|
//! | NoDeposit | deposit   | Deposited | InsufficientBalance  |
//! | Deposited | deposit   | -         | DepositAlreadyActive |
//! | Deposited | withdraw  | NoDeposit | ArithmeticOverflow   |
//! | NoDeposit | withdraw  | -         | NoActiveDeposit      |

use std::collections::BTreeMap;

use savings_common::{
    config::InterestSchedule,
    errors::{LedgerError, LedgerResult},
    types::{Address, DepositRecord, DepositStatus, Timestamp, WithdrawalResult},
};

use crate::ledger::Ledger;

/// Escrow records and the schedule they accrue under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEngine {
    schedule: InterestSchedule,
    records: BTreeMap<Address, DepositRecord>,
}

impl DepositEngine {
    pub fn new(schedule: InterestSchedule) -> Self {
        Self {
            schedule,
            records: BTreeMap::new(),
        }
    }

    pub fn schedule(&self) -> &InterestSchedule {
        &self.schedule
    }

    pub fn status(&self, account: &Address) -> DepositStatus {
        if self.records.contains_key(account) {
            DepositStatus::Deposited
        } else {
            DepositStatus::NoDeposit
        }
    }

    pub fn deposit_of(&self, account: &Address) -> Option<DepositRecord> {
        self.records.get(account).copied()
    }

    /// Active records, in address order
    pub fn records(&self) -> impl Iterator<Item = (&Address, &DepositRecord)> {
        self.records.iter()
    }

    /// Sum of all escrowed principal, `None` on overflow
    pub fn total_escrowed(&self) -> Option<u64> {
        self.records
            .values()
            .try_fold(0u64, |acc, record| acc.checked_add(record.amount))
    }

    /// Interest a withdrawal at `now` would pay; zero without a deposit
    pub fn pending_interest(&self, account: &Address, now: Timestamp) -> LedgerResult<u64> {
        match self.records.get(account) {
            Some(record) => self
                .schedule
                .interest_for(record.amount, record.elapsed(now)),
            None => Ok(0),
        }
    }

    /// Escrow `amount` from the spendable balance of `account`
    pub(crate) fn deposit(
        &mut self,
        ledger: &mut Ledger,
        account: &Address,
        amount: u64,
        now: Timestamp,
    ) -> LedgerResult<DepositRecord> {
        if self.records.contains_key(account) {
            return Err(LedgerError::DepositAlreadyActive { account: *account });
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        ledger.escrow(account, amount)?;

        let record = DepositRecord::new(amount, now);
        self.records.insert(*account, record);
        Ok(record)
    }

    /// Release the escrow of `account` with interest accrued up to `now`
    pub(crate) fn withdraw(
        &mut self,
        ledger: &mut Ledger,
        account: &Address,
        now: Timestamp,
    ) -> LedgerResult<WithdrawalResult> {
        let record = self
            .records
            .get(account)
            .copied()
            .ok_or(LedgerError::NoActiveDeposit { account: *account })?;

        let interest = self
            .schedule
            .interest_for(record.amount, record.elapsed(now))?;
        let new_balance = ledger.release(account, record.amount, interest)?;

        self.records.remove(account);
        Ok(WithdrawalResult {
            principal: record.amount,
            interest,
            new_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savings_common::constants::ESCROW_ADDRESS;

    const OWNER: Address = [1u8; 32];
    const ALICE: Address = [2u8; 32];

    fn setup() -> (Ledger, DepositEngine) {
        (
            Ledger::genesis(OWNER, 10_000),
            DepositEngine::new(InterestSchedule::default()),
        )
    }

    #[test]
    fn test_deposit_escrows_funds() {
        let (mut ledger, mut engine) = setup();
        let record = engine.deposit(&mut ledger, &OWNER, 100, 1_000).unwrap();

        assert_eq!(record, DepositRecord::new(100, 1_000));
        assert_eq!(ledger.balance_of(&OWNER), 9_900);
        assert_eq!(engine.status(&OWNER), DepositStatus::Deposited);
        assert_eq!(engine.deposit_of(&OWNER), Some(record));
        assert_eq!(engine.total_escrowed(), Some(100));
        assert_eq!(ledger.escrowed(), 100);
        assert_eq!(ledger.balance_sum(), Some(ledger.total_supply()));
    }

    #[test]
    fn test_escrow_account_cannot_deposit() {
        let (mut ledger, mut engine) = setup();
        assert_eq!(
            engine.deposit(&mut ledger, &ESCROW_ADDRESS, 1, 0),
            Err(LedgerError::ReservedAccount {
                account: ESCROW_ADDRESS
            })
        );
        assert_eq!(engine.status(&ESCROW_ADDRESS), DepositStatus::NoDeposit);
    }

    #[test]
    fn test_withdraw_against_other_ledger_fails() {
        let (mut ledger, mut engine) = setup();
        engine.deposit(&mut ledger, &OWNER, 1_000, 0).unwrap();

        // A ledger that never received this escrow cannot pay it out
        let mut other = Ledger::genesis(ALICE, 1_000);
        let other_before = other.clone();
        let result = engine.withdraw(&mut other, &OWNER, 300);

        assert!(matches!(result, Err(LedgerError::InvariantViolated { .. })));
        assert_eq!(other, other_before);
        assert_eq!(other.balance_of(&OWNER), 0);
        assert_eq!(other.balance_sum(), Some(other.total_supply()));
        assert_eq!(engine.deposit_of(&OWNER), Some(DepositRecord::new(1_000, 0)));
    }

    #[test]
    fn test_deposit_insufficient_balance() {
        let (mut ledger, mut engine) = setup();
        let result = engine.deposit(&mut ledger, &ALICE, 1, 0);

        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(engine.status(&ALICE), DepositStatus::NoDeposit);
    }

    #[test]
    fn test_double_deposit_rejected() {
        let (mut ledger, mut engine) = setup();
        engine.deposit(&mut ledger, &OWNER, 100, 0).unwrap();
        let ledger_before = ledger.clone();
        let engine_before = engine.clone();

        let result = engine.deposit(&mut ledger, &OWNER, 50, 10);
        assert_eq!(result, Err(LedgerError::DepositAlreadyActive { account: OWNER }));
        assert_eq!(ledger, ledger_before);
        assert_eq!(engine, engine_before);
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let (mut ledger, mut engine) = setup();
        assert_eq!(
            engine.deposit(&mut ledger, &OWNER, 0, 0),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(engine.status(&OWNER), DepositStatus::NoDeposit);
    }

    #[test]
    fn test_withdraw_without_deposit() {
        let (mut ledger, mut engine) = setup();
        assert_eq!(
            engine.withdraw(&mut ledger, &ALICE, 0),
            Err(LedgerError::NoActiveDeposit { account: ALICE })
        );
    }

    #[test]
    fn test_withdraw_pays_interest() {
        let (mut ledger, mut engine) = setup();
        engine.deposit(&mut ledger, &OWNER, 100, 1_000).unwrap();

        assert_eq!(engine.pending_interest(&OWNER, 1_299).unwrap(), 0);
        assert_eq!(engine.pending_interest(&OWNER, 1_300).unwrap(), 2);

        let result = engine.withdraw(&mut ledger, &OWNER, 1_300).unwrap();
        assert_eq!(result.principal, 100);
        assert_eq!(result.interest, 2);
        assert_eq!(result.total(), 102);
        assert_eq!(result.new_balance, 10_002);
        assert_eq!(ledger.total_supply(), 10_002);
        assert_eq!(engine.status(&OWNER), DepositStatus::NoDeposit);
        assert_eq!(engine.pending_interest(&OWNER, 5_000).unwrap(), 0);
    }

    #[test]
    fn test_clock_behind_start_pays_no_interest() {
        let (mut ledger, mut engine) = setup();
        engine.deposit(&mut ledger, &OWNER, 100, 1_000).unwrap();

        let result = engine.withdraw(&mut ledger, &OWNER, 400).unwrap();
        assert_eq!(result.interest, 0);
        assert_eq!(ledger.balance_of(&OWNER), 10_000);
    }

    #[test]
    fn test_withdraw_overflow_keeps_record() {
        let mut ledger = Ledger::genesis(OWNER, u64::MAX);
        let mut engine = DepositEngine::new(InterestSchedule::default());
        engine.deposit(&mut ledger, &OWNER, 1_000, 0).unwrap();
        let ledger_before = ledger.clone();

        // Supply is already at u64::MAX, so any interest overflows it
        let result = engine.withdraw(&mut ledger, &OWNER, 300);
        assert_eq!(result, Err(LedgerError::ArithmeticOverflow));
        assert_eq!(ledger, ledger_before);
        assert_eq!(engine.deposit_of(&OWNER), Some(DepositRecord::new(1_000, 0)));
    }
}
