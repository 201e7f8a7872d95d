//! # milk-types
//!
//! Shared types, errors, and configuration for the **Milk** role-gated ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`Party`]
//! - **Access control**: [`Role`], [`RoleId`]
//! - **Amounts**: [`Amount`] plus the cross-chain payload codec ([`decode_amount`], [`encode_amount`])
//! - **Event model**: [`MovementRecord`], [`LedgerEvent`], [`LoggedEvent`]
//! - **Configuration**: [`LedgerConfig`], [`RoleGrant`]
//! - **Errors**: [`MilkError`] with `MK_ERR_` prefix codes
//! - **Constants**: token defaults and wire sizes

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod movement;
pub mod role;

// Re-export all primary types at crate root for ergonomic imports:
//   use milk_types::{AccountId, Role, MovementRecord, ...};

pub use amount::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use movement::*;
pub use role::*;

// Constants are accessed via `milk_types::constants::FOO`
// (not re-exported to avoid name collisions).
