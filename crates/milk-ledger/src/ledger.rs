//! The role-gated ledger.
//!
//! Every mutating call follows the same pipeline:
//!
//! ```text
//! caller → [role check] → [decode / balance plan] → [supply check] → apply → emit
//! ```
//!
//! Every check runs before the first write, so a rejected call leaves
//! balances, roles, allowances, and the event log exactly as they were.

use std::collections::HashMap;

use alloy_primitives::U256;
use milk_types::{
    AccountId, Amount, DebitAction, LedgerConfig, LedgerEvent, LoggedEvent, MilkError,
    MovementRecord, Result, Role, decode_amount,
};

use crate::{
    balance_book::{BalanceBook, BalancePlan},
    event_log::EventLog,
    role_registry::RoleRegistry,
    supply_conservation::{SupplyConservation, SupplyFlow, SupplyReport},
};

/// Bridge-backed game currency ledger with three privilege tiers plus an
/// implicit administrator.
///
/// | Gate      | Operations                                                   |
/// |-----------|--------------------------------------------------------------|
/// | Admin     | `setup_role`, `revoke_role`                                  |
/// | Depositor | `deposit`                                                    |
/// | Contract  | `game_mint`, `game_burn`, `game_transfer_from`, `game_withdraw` |
/// | none      | `withdraw`, `transfer`, `approve`, `transfer_from`           |
///
/// `Master` is assignable but gates nothing.
#[derive(Debug)]
pub struct RoleGatedLedger {
    config: LedgerConfig,
    roles: RoleRegistry,
    book: BalanceBook,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    supply: SupplyConservation,
    log: EventLog,
}

impl RoleGatedLedger {
    /// Create a ledger. The configured admin receives [`Role::Admin`], then
    /// every genesis grant is applied on the admin's behalf.
    ///
    /// # Errors
    /// Returns `Configuration` if the config fails validation.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let admin = config.admin;
        let genesis = config.genesis_roles.clone();

        let mut ledger = Self {
            config,
            roles: RoleRegistry::new(),
            book: BalanceBook::new(),
            allowances: HashMap::new(),
            supply: SupplyConservation::new(),
            log: EventLog::new(),
        };

        ledger.roles.grant(Role::Admin, admin);
        ledger.log.append(LedgerEvent::RoleGranted {
            role: Role::Admin,
            account: admin,
            sender: admin,
        });
        for grant in genesis {
            ledger.setup_role(admin, grant.role, grant.account)?;
        }

        tracing::info!(
            name = %ledger.config.name,
            symbol = %ledger.config.symbol,
            admin = %admin,
            reserve = %ledger.config.ledger_account,
            "Ledger created"
        );
        Ok(ledger)
    }

    // =================================================================
    // Administration
    // =================================================================

    /// Grant `role` to `account`. Admin only. Returns whether membership
    /// changed; re-granting is a no-op that emits nothing.
    pub fn setup_role(
        &mut self,
        caller: AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool> {
        self.authorize(caller, Role::Admin, "setup_role")?;
        let changed = self.roles.grant(role, account);
        if changed {
            self.log.append(LedgerEvent::RoleGranted {
                role,
                account,
                sender: caller,
            });
            tracing::info!(role = %role, account = %account, admin = %caller, "Role granted");
        }
        Ok(changed)
    }

    /// Revoke `role` from `account`. Admin only. Returns whether membership
    /// changed.
    pub fn revoke_role(
        &mut self,
        caller: AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool> {
        self.authorize(caller, Role::Admin, "revoke_role")?;
        let changed = self.roles.revoke(role, account);
        if changed {
            self.log.append(LedgerEvent::RoleRevoked {
                role,
                account,
                sender: caller,
            });
            tracing::info!(role = %role, account = %account, admin = %caller, "Role revoked");
        }
        Ok(changed)
    }

    // =================================================================
    // Bridge entry / exit
    // =================================================================

    /// Credit value locked on the paired chain. Depositor only.
    ///
    /// `encoded_amount` must be a single 32-byte big-endian word. Deposits
    /// are not idempotent: replaying a payload credits again.
    ///
    /// # Errors
    /// `Unauthorized`, `MalformedPayload`, or `Overflow`.
    pub fn deposit(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        encoded_amount: &[u8],
    ) -> Result<MovementRecord> {
        self.authorize(caller, Role::Depositor, "deposit")?;
        let amount = decode_amount(encoded_amount)?;
        let plan = self.book.plan_mint(recipient, amount)?;
        self.commit(
            plan,
            MovementRecord::mint(recipient, amount),
            SupplyFlow::Deposit,
        )
    }

    /// Release the caller's own value back to the paired chain.
    ///
    /// # Errors
    /// `InsufficientBalance` if the caller holds less than `amount`.
    pub fn withdraw(&mut self, caller: AccountId, amount: Amount) -> Result<MovementRecord> {
        let plan = self.book.plan_burn(caller, amount, DebitAction::Burn)?;
        self.commit(
            plan,
            MovementRecord::burn(caller, amount),
            SupplyFlow::Withdrawal,
        )
    }

    // =================================================================
    // Game economy (Contract role)
    // =================================================================

    /// Create value for `recipient`.
    ///
    /// # Errors
    /// `Unauthorized` or `Overflow`.
    pub fn game_mint(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<MovementRecord> {
        self.authorize(caller, Role::Contract, "game_mint")?;
        let plan = self.book.plan_mint(recipient, amount)?;
        self.commit(
            plan,
            MovementRecord::mint(recipient, amount),
            SupplyFlow::GameMint,
        )
    }

    /// Sink `amount` from `account` into the reserve. Total supply is
    /// unchanged.
    ///
    /// # Errors
    /// `Unauthorized` or `InsufficientBalance`.
    pub fn game_burn(
        &mut self,
        caller: AccountId,
        account: AccountId,
        amount: Amount,
    ) -> Result<MovementRecord> {
        self.authorize(caller, Role::Contract, "game_burn")?;
        let reserve = self.config.ledger_account;
        let plan = self.book.plan_transfer(account, reserve, amount)?;
        self.commit(
            plan,
            MovementRecord::transfer(account, reserve, amount),
            SupplyFlow::ReserveSink,
        )
    }

    /// Move value between accounts without any allowance.
    ///
    /// # Errors
    /// `Unauthorized` or `InsufficientBalance`.
    pub fn game_transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<MovementRecord> {
        self.authorize(caller, Role::Contract, "game_transfer_from")?;
        let plan = self.book.plan_transfer(from, to, amount)?;
        self.commit(
            plan,
            MovementRecord::transfer(from, to, amount),
            SupplyFlow::Internal,
        )
    }

    /// Release value from `account` to the paired chain on its behalf.
    ///
    /// # Errors
    /// `Unauthorized` or `InsufficientBalance`.
    pub fn game_withdraw(
        &mut self,
        caller: AccountId,
        account: AccountId,
        amount: Amount,
    ) -> Result<MovementRecord> {
        self.authorize(caller, Role::Contract, "game_withdraw")?;
        let plan = self.book.plan_burn(account, amount, DebitAction::Burn)?;
        self.commit(
            plan,
            MovementRecord::burn(account, amount),
            SupplyFlow::GameWithdrawal,
        )
    }

    // =================================================================
    // Holder operations
    // =================================================================

    /// Move the caller's own value.
    ///
    /// # Errors
    /// `InsufficientBalance`.
    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<MovementRecord> {
        let plan = self.book.plan_transfer(caller, to, amount)?;
        self.commit(
            plan,
            MovementRecord::transfer(caller, to, amount),
            SupplyFlow::Internal,
        )
    }

    /// Set the amount `spender` may move out of the caller's account.
    /// Overwrites any previous allowance.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(caller, spender));
        } else {
            self.allowances.insert((caller, spender), amount);
        }
        self.log.append(LedgerEvent::Approval {
            owner: caller,
            spender,
            amount,
        });
        tracing::debug!(owner = %caller, spender = %spender, amount = %amount, "Approval set");
    }

    /// Move value out of `from` using the caller's allowance. An allowance
    /// of `U256::MAX` is never decremented.
    ///
    /// # Errors
    /// `InsufficientAllowance` or `InsufficientBalance`.
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<MovementRecord> {
        let allowed = self.allowance(from, caller);
        if allowed < amount {
            return Err(MilkError::InsufficientAllowance {
                spender: caller,
                needed: amount,
                allowed,
            });
        }
        let plan = self.book.plan_transfer(from, to, amount)?;
        let record = self.commit(
            plan,
            MovementRecord::transfer(from, to, amount),
            SupplyFlow::Internal,
        )?;

        if allowed != U256::MAX {
            let remaining = allowed - amount;
            if remaining.is_zero() {
                self.allowances.remove(&(from, caller));
            } else {
                self.allowances.insert((from, caller), remaining);
            }
        }
        Ok(record)
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    /// The ledger's own account, which receives game burns.
    #[must_use]
    pub fn reserve_account(&self) -> AccountId {
        self.config.ledger_account
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.book.balance_of(account)
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.book.total_supply()
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    #[must_use]
    pub fn has_role(&self, role: Role, account: AccountId) -> bool {
        self.roles.has_role(role, account)
    }

    #[must_use]
    pub fn members(&self, role: Role) -> Vec<AccountId> {
        self.roles.members(role)
    }

    /// Every event emitted so far, in order.
    #[must_use]
    pub fn events(&self) -> &[LoggedEvent] {
        self.log.entries()
    }

    /// Value movements only, in emission order.
    pub fn movements(&self) -> impl Iterator<Item = &MovementRecord> {
        self.log.movements()
    }

    /// Head of the event-log hash chain.
    #[must_use]
    pub fn log_digest(&self) -> [u8; 32] {
        self.log.head_digest()
    }

    #[must_use]
    pub fn supply_report(&self) -> SupplyReport {
        SupplyReport {
            total_supply: self.book.total_supply(),
            deposits: self.supply.total_deposits(),
            game_mints: self.supply.total_game_mints(),
            withdrawals: self.supply.total_withdrawals(),
            game_withdrawals: self.supply.total_game_withdrawals(),
            reserve_sinks: self.supply.total_reserve_sinks(),
            reserve_balance: self.book.balance_of(self.config.ledger_account),
            holders: self.book.holder_count(),
        }
    }

    /// Full audit: summed balances, running total, and flow counters must
    /// agree, and the event log must replay to its head.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` on any disagreement.
    pub fn verify_supply(&self) -> Result<()> {
        let summed = self.book.sum_balances()?;
        if summed != self.book.total_supply() {
            return Err(MilkError::SupplyInvariantViolation {
                reason: format!(
                    "summed balances {summed} != running total {}",
                    self.book.total_supply()
                ),
            });
        }
        self.supply.verify(summed)?;
        if !self.log.verify_chain() {
            return Err(MilkError::SupplyInvariantViolation {
                reason: "event log does not replay to its head".into(),
            });
        }
        Ok(())
    }

    // =================================================================
    // Internals
    // =================================================================

    fn authorize(&self, caller: AccountId, role: Role, operation: &'static str) -> Result<()> {
        self.roles.ensure(role, caller).inspect_err(|_| {
            tracing::warn!(
                caller = %caller,
                role = %role,
                operation,
                "Unauthorized call rejected"
            );
        })
    }

    /// Last gate before mutation: the plan's resulting supply must match
    /// the flow counters once this movement is counted.
    fn commit(
        &mut self,
        plan: BalancePlan,
        record: MovementRecord,
        flow: SupplyFlow,
    ) -> Result<MovementRecord> {
        let mut supply = self.supply.clone();
        supply.record(flow, record.amount);
        if let Err(err) = supply.verify(plan.total_supply()) {
            tracing::error!(error = %err, from = %record.from, to = %record.to, "Supply invariant violated");
            return Err(err);
        }

        self.book.apply(plan);
        self.supply = supply;
        self.log.append(LedgerEvent::Transfer(record));

        tracing::debug!(
            from = %record.from,
            to = %record.to,
            amount = %record.amount,
            supply = %self.book.total_supply(),
            "Movement applied"
        );
        Ok(record)
    }
}
