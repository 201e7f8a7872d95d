//! Supply conservation invariant checker.
//!
//! Invariant enforced before every balance change is committed:
//! ```text
//! Σ(balances) == Σ(deposits) + Σ(game mints) − Σ(withdrawals) − Σ(game withdrawals)
//! ```
//!
//! Game burns move value into the reserve account, so they are tracked for
//! reporting but never enter the equation.
//!
//! Counters accumulate modulo 2^256. The true supply always fits in 256 bits,
//! so `inflow − outflow` evaluated with wrapping arithmetic is exact even
//! after a counter wraps.

use milk_types::{Amount, MilkError, Result};
use serde::{Deserialize, Serialize};

/// Which counter a committed movement feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyFlow {
    /// Bridge entry (null → account).
    Deposit,
    /// Game-internal creation (null → account).
    GameMint,
    /// Self-service bridge exit (account → null).
    Withdrawal,
    /// Game-initiated exit on behalf of an account (account → null).
    GameWithdrawal,
    /// Game burn routed into the reserve (account → reserve).
    ReserveSink,
    /// Any other account-to-account move.
    Internal,
}

/// Cumulative supply counters since genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyConservation {
    deposits: Amount,
    game_mints: Amount,
    withdrawals: Amount,
    game_withdrawals: Amount,
    reserve_sinks: Amount,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed movement.
    pub fn record(&mut self, flow: SupplyFlow, amount: Amount) {
        let counter = match flow {
            SupplyFlow::Deposit => &mut self.deposits,
            SupplyFlow::GameMint => &mut self.game_mints,
            SupplyFlow::Withdrawal => &mut self.withdrawals,
            SupplyFlow::GameWithdrawal => &mut self.game_withdrawals,
            SupplyFlow::ReserveSink => &mut self.reserve_sinks,
            SupplyFlow::Internal => return,
        };
        *counter = counter.wrapping_add(amount);
    }

    /// Expected total supply: inflows minus outflows.
    #[must_use]
    pub fn expected_supply(&self) -> Amount {
        self.deposits
            .wrapping_add(self.game_mints)
            .wrapping_sub(self.withdrawals)
            .wrapping_sub(self.game_withdrawals)
    }

    /// Verify an actual supply against the counters.
    ///
    /// # Errors
    /// Returns [`MilkError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: Amount) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(MilkError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (deposits={}, game_mints={}, withdrawals={}, game_withdrawals={})",
                    self.deposits, self.game_mints, self.withdrawals, self.game_withdrawals,
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_deposits(&self) -> Amount {
        self.deposits
    }

    #[must_use]
    pub fn total_game_mints(&self) -> Amount {
        self.game_mints
    }

    #[must_use]
    pub fn total_withdrawals(&self) -> Amount {
        self.withdrawals
    }

    #[must_use]
    pub fn total_game_withdrawals(&self) -> Amount {
        self.game_withdrawals
    }

    #[must_use]
    pub fn total_reserve_sinks(&self) -> Amount {
        self.reserve_sinks
    }
}

/// Point-in-time supply snapshot for observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyReport {
    pub total_supply: Amount,
    pub deposits: Amount,
    pub game_mints: Amount,
    pub withdrawals: Amount,
    pub game_withdrawals: Amount,
    pub reserve_sinks: Amount,
    pub reserve_balance: Amount,
    pub holders: usize,
}

impl SupplyReport {
    /// Whether the snapshot reconciles on its own terms.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.deposits
            .wrapping_add(self.game_mints)
            .wrapping_sub(self.withdrawals)
            .wrapping_sub(self.game_withdrawals)
            == self.total_supply
    }
}
