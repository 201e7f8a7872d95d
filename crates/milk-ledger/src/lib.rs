//! # milk-ledger
//!
//! The role-gated ledger engine: a bridge-backed game currency whose every
//! mutating call passes an access-control gate before touching balances.
//!
//! ## Architecture
//!
//! [`RoleGatedLedger`] owns four parts and drives them in a fixed order:
//! 1. **RoleRegistry**: who holds which role
//! 2. **BalanceBook**: plans and applies balance changes with checked arithmetic
//! 3. **SupplyConservation**: flow counters that must reconcile with total supply
//! 4. **EventLog**: append-only, hash-chained record of what was emitted
//!
//! ## Call Flow
//!
//! ```text
//! caller → RoleRegistry.ensure() → BalanceBook.plan_*() → SupplyConservation.verify()
//!        → BalanceBook.apply() → EventLog.append()
//! ```
//!
//! A call that fails at any step leaves no trace.

pub mod balance_book;
pub mod event_log;
pub mod ledger;
pub mod role_registry;
pub mod supply_conservation;

pub use balance_book::{BalanceBook, BalancePlan};
pub use event_log::EventLog;
pub use ledger::RoleGatedLedger;
pub use role_registry::RoleRegistry;
pub use supply_conservation::{SupplyConservation, SupplyFlow, SupplyReport};
