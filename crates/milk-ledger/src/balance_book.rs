//! Balance book: the source of truth for account balances and total supply.
//!
//! Mutations are two-step: a `plan_*` call validates the change with checked
//! arithmetic and returns a [`BalancePlan`] without touching state, then
//! [`BalanceBook::apply`] commits it. A failed plan leaves the book unchanged.

use std::collections::HashMap;

use alloy_primitives::U256;
use milk_types::{AccountId, Amount, DebitAction, MilkError, Result};

/// Validated balance writes, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a plan does nothing until applied"]
pub struct BalancePlan {
    /// Final balance of every touched account.
    writes: Vec<(AccountId, Amount)>,
    /// Total supply after the plan is applied.
    total_supply: Amount,
}

impl BalancePlan {
    /// Total supply once this plan is applied.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance `account` will hold after the plan, if the plan touches it.
    pub fn balance_after(&self, account: AccountId) -> Option<Amount> {
        self.writes
            .iter()
            .rev()
            .find(|(id, _)| *id == account)
            .map(|(_, bal)| *bal)
    }
}

/// Per-account balances with a running total supply.
///
/// Accounts are implicit: an account with zero balance is not stored.
#[derive(Debug, Default)]
pub struct BalanceBook {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
}

impl BalanceBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an account (zero if never credited).
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(U256::ZERO)
    }

    /// Running total supply.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of accounts holding a non-zero balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Recompute total supply from scratch by summing every balance.
    ///
    /// # Errors
    /// Returns `Overflow` if the balances cannot be summed in 256 bits,
    /// which means the book is corrupt.
    pub fn sum_balances(&self) -> Result<Amount> {
        self.balances
            .values()
            .try_fold(U256::ZERO, |acc, bal| acc.checked_add(*bal))
            .ok_or_else(|| MilkError::Overflow {
                context: "sum of balances".into(),
            })
    }

    /// Plan a credit from nothing (deposit, game mint).
    ///
    /// # Errors
    /// Returns `Overflow` if the recipient balance or total supply would
    /// exceed 256 bits.
    pub fn plan_mint(&self, to: AccountId, amount: Amount) -> Result<BalancePlan> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| overflow("total supply", amount))?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| overflow("recipient balance", amount))?;
        Ok(BalancePlan {
            writes: vec![(to, credited)],
            total_supply,
        })
    }

    /// Plan a debit to nothing (withdraw, game withdraw).
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    pub fn plan_burn(
        &self,
        from: AccountId,
        amount: Amount,
        action: DebitAction,
    ) -> Result<BalancePlan> {
        let debited = self.debit(from, amount, action)?;
        let total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or_else(|| MilkError::Internal("total supply below an account balance".into()))?;
        Ok(BalancePlan {
            writes: vec![(from, debited)],
            total_supply,
        })
    }

    /// Plan a move between two accounts. Total supply is unchanged.
    /// A self-transfer is valid and leaves the balance as it was.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    pub fn plan_transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<BalancePlan> {
        let debited = self.debit(from, amount, DebitAction::Transfer)?;
        let base = if from == to {
            debited
        } else {
            self.balance_of(to)
        };
        let credited = base
            .checked_add(amount)
            .ok_or_else(|| overflow("recipient balance", amount))?;
        Ok(BalancePlan {
            writes: vec![(from, debited), (to, credited)],
            total_supply: self.total_supply,
        })
    }

    /// Commit a plan produced by this book.
    pub fn apply(&mut self, plan: BalancePlan) {
        for (account, balance) in plan.writes {
            if balance.is_zero() {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, balance);
            }
        }
        self.total_supply = plan.total_supply;
    }

    fn debit(&self, from: AccountId, amount: Amount, action: DebitAction) -> Result<Amount> {
        let available = self.balance_of(from);
        available
            .checked_sub(amount)
            .ok_or(MilkError::InsufficientBalance {
                action,
                account: from,
                needed: amount,
                available,
            })
    }
}

fn overflow(what: &str, amount: Amount) -> MilkError {
    MilkError::Overflow {
        context: format!("crediting {amount} overflows {what}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(n: u64) -> Amount {
        U256::from(n)
    }

    #[test]
    fn nonexistent_balance_is_zero() {
        let book = BalanceBook::new();
        assert_eq!(book.balance_of(AccountId::from_seed(1)), U256::ZERO);
        assert_eq!(book.total_supply(), U256::ZERO);
    }

    #[test]
    fn mint_credits_and_grows_supply() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        let plan = book.plan_mint(a, amt(100)).unwrap();
        assert_eq!(plan.total_supply(), amt(100));
        assert_eq!(plan.balance_after(a), Some(amt(100)));
        // Planning alone changes nothing.
        assert_eq!(book.balance_of(a), U256::ZERO);

        book.apply(plan);
        assert_eq!(book.balance_of(a), amt(100));
        assert_eq!(book.total_supply(), amt(100));
        assert_eq!(book.holder_count(), 1);
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        let b = AccountId::from_seed(2);
        book.apply(book.plan_mint(a, U256::MAX).unwrap());

        let err = book.plan_mint(b, amt(1)).unwrap_err();
        assert!(matches!(err, MilkError::Overflow { .. }));
        assert_eq!(book.balance_of(b), U256::ZERO);
        assert_eq!(book.total_supply(), U256::MAX);
    }

    #[test]
    fn burn_debits_and_shrinks_supply() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        book.apply(book.plan_mint(a, amt(100)).unwrap());
        book.apply(book.plan_burn(a, amt(40), DebitAction::Burn).unwrap());
        assert_eq!(book.balance_of(a), amt(60));
        assert_eq!(book.total_supply(), amt(60));
    }

    #[test]
    fn burn_insufficient_fails_without_change() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        book.apply(book.plan_mint(a, amt(10)).unwrap());

        let err = book.plan_burn(a, amt(11), DebitAction::Burn).unwrap_err();
        match err {
            MilkError::InsufficientBalance {
                action,
                account,
                needed,
                available,
            } => {
                assert_eq!(action, DebitAction::Burn);
                assert_eq!(account, a);
                assert_eq!(needed, amt(11));
                assert_eq!(available, amt(10));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(book.balance_of(a), amt(10));
    }

    #[test]
    fn full_burn_prunes_account() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        book.apply(book.plan_mint(a, amt(5)).unwrap());
        book.apply(book.plan_burn(a, amt(5), DebitAction::Burn).unwrap());
        assert_eq!(book.holder_count(), 0);
        assert_eq!(book.balance_of(a), U256::ZERO);
    }

    #[test]
    fn transfer_moves_value_and_keeps_supply() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        let b = AccountId::from_seed(2);
        book.apply(book.plan_mint(a, amt(100)).unwrap());
        book.apply(book.plan_transfer(a, b, amt(30)).unwrap());
        assert_eq!(book.balance_of(a), amt(70));
        assert_eq!(book.balance_of(b), amt(30));
        assert_eq!(book.total_supply(), amt(100));
    }

    #[test]
    fn self_transfer_is_neutral() {
        let mut book = BalanceBook::new();
        let a = AccountId::from_seed(1);
        book.apply(book.plan_mint(a, amt(100)).unwrap());
        book.apply(book.plan_transfer(a, a, amt(100)).unwrap());
        assert_eq!(book.balance_of(a), amt(100));
        assert!(book.plan_transfer(a, a, amt(101)).is_err());
    }

    #[test]
    fn transfer_insufficient_uses_transfer_wording() {
        let book = BalanceBook::new();
        let err = book
            .plan_transfer(AccountId::from_seed(1), AccountId::from_seed(2), amt(1))
            .unwrap_err();
        assert!(format!("{err}").contains("transfer amount exceeds balance"));
    }

    #[test]
    fn sum_matches_running_total() {
        let mut book = BalanceBook::new();
        for seed in 0..10 {
            book.apply(book.plan_mint(AccountId::from_seed(seed), amt(seed + 1)).unwrap());
        }
        assert_eq!(book.sum_balances().unwrap(), book.total_supply());
        assert_eq!(book.total_supply(), amt(55));
    }
}
