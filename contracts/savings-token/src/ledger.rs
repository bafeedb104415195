//! Balance Ledger
//!
//! Owns the account → balance table, the owner identity and the supply
//! counters. Escrowed deposit principal sits in the table under
//! [`ESCROW_ADDRESS`], so the sum of every balance is the total supply.
//! Every mutating method computes all new values with checked arithmetic
//! before writing any of them, so an `Err` leaves the ledger untouched.

use std::collections::BTreeMap;

use savings_common::{
    constants::ESCROW_ADDRESS,
    errors::{LedgerError, LedgerResult},
    math::{safe_add, safe_sub},
    types::{Address, TransferResult},
};

/// Account balances and supply bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Account that received the genesis supply
    owner: Address,
    /// Supply minted at genesis
    genesis_supply: u64,
    /// Genesis supply plus all interest issued since
    total_supply: u64,
    /// Non-zero balances, the escrow account included
    balances: BTreeMap<Address, u64>,
}

impl Ledger {
    /// Mint `supply` to `owner`. This is the only way to build a ledger.
    pub fn genesis(owner: Address, supply: u64) -> Self {
        let mut balances = BTreeMap::new();
        if supply > 0 {
            balances.insert(owner, supply);
        }
        Self {
            owner,
            genesis_supply: supply,
            total_supply: supply,
            balances,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn genesis_supply(&self) -> u64 {
        self.genesis_supply
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Interest issued on top of the genesis supply
    pub fn issued(&self) -> u64 {
        self.total_supply.saturating_sub(self.genesis_supply)
    }

    /// Balance of `account`; zero for unknown accounts
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Principal currently held in escrow
    pub fn escrowed(&self) -> u64 {
        self.balance_of(&ESCROW_ADDRESS)
    }

    /// Sum of every balance, `None` on overflow
    pub fn balance_sum(&self) -> Option<u64> {
        self.balances
            .values()
            .try_fold(0u64, |acc, balance| acc.checked_add(*balance))
    }

    /// Accounts with a non-zero balance, in address order
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.balances.iter()
    }

    /// Move `amount` from `from` to `to`
    ///
    /// Neither side may be the escrow account.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> LedgerResult<TransferResult> {
        for account in [from, to] {
            if *account == ESCROW_ADDRESS {
                return Err(LedgerError::ReservedAccount { account: *account });
            }
        }
        self.move_balance(from, to, amount)
    }

    /// Move `amount` of `account`'s balance into escrow
    pub(crate) fn escrow(&mut self, account: &Address, amount: u64) -> LedgerResult<u64> {
        if *account == ESCROW_ADDRESS {
            return Err(LedgerError::ReservedAccount { account: *account });
        }
        self.move_balance(account, &ESCROW_ADDRESS, amount)
            .map(|result| result.from_balance)
    }

    /// Return `principal` from escrow to `account` along with freshly
    /// issued `interest`
    ///
    /// The escrow, the account balance and the total supply are all checked
    /// before any of them is written.
    pub(crate) fn release(
        &mut self,
        account: &Address,
        principal: u64,
        interest: u64,
    ) -> LedgerResult<u64> {
        let escrowed = self.escrowed();
        if escrowed < principal {
            return Err(LedgerError::InvariantViolated {
                reason: "escrow holds less than the deposit principal",
            });
        }
        let new_escrow = safe_sub(escrowed, principal)?;
        let credit = safe_add(principal, interest)?;
        let new_balance = safe_add(self.balance_of(account), credit)?;
        let new_supply = safe_add(self.total_supply, interest)?;

        self.set_balance(ESCROW_ADDRESS, new_escrow);
        self.set_balance(*account, new_balance);
        self.total_supply = new_supply;
        Ok(new_balance)
    }

    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> LedgerResult<TransferResult> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: from_balance,
                requested: amount,
            });
        }

        if from == to {
            return Ok(TransferResult {
                from_balance,
                to_balance: from_balance,
                amount,
            });
        }

        let new_from = safe_sub(from_balance, amount)?;
        let new_to = safe_add(self.balance_of(to), amount)?;

        self.set_balance(*from, new_from);
        self.set_balance(*to, new_to);

        Ok(TransferResult {
            from_balance: new_from,
            to_balance: new_to,
            amount,
        })
    }

    fn set_balance(&mut self, account: Address, balance: u64) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}
