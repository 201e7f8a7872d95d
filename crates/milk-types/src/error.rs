//! Error types for the Milk ledger.
//!
//! All errors use the `MK_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Access control errors
//! - 2xx: Balance / allowance errors
//! - 3xx: Cross-chain payload errors
//! - 4xx: Arithmetic errors
//! - 5xx: Input parsing errors
//! - 8xx: Invariant errors
//! - 9xx: General / internal errors

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AccountId, RoleId};

/// Which kind of debit was refused. Selects the wording of
/// [`MilkError::InsufficientBalance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebitAction {
    /// Value leaves circulation (withdraw, game withdraw).
    Burn,
    /// Value moves to another account (transfer, game burn into the reserve).
    Transfer,
}

impl fmt::Display for DebitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Burn => write!(f, "burn"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// Central error enum for all Milk ledger operations.
#[derive(Debug, Error)]
pub enum MilkError {
    // =================================================================
    // Access Control Errors (1xx)
    // =================================================================
    /// The caller does not hold the role the operation is gated on.
    #[error("MK_ERR_100: AccessControl: account {account} is missing role {role}")]
    Unauthorized { account: AccountId, role: RoleId },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// A debit exceeds the account's balance.
    #[error(
        "MK_ERR_200: {action} amount exceeds balance: account {account} needs {needed}, has {available}"
    )]
    InsufficientBalance {
        action: DebitAction,
        account: AccountId,
        needed: U256,
        available: U256,
    },

    /// A delegated transfer exceeds the spender's allowance.
    #[error(
        "MK_ERR_201: insufficient allowance: spender {spender} needs {needed}, allowed {allowed}"
    )]
    InsufficientAllowance {
        spender: AccountId,
        needed: U256,
        allowed: U256,
    },

    // =================================================================
    // Payload Errors (3xx)
    // =================================================================
    /// The cross-chain deposit payload did not decode to a single amount.
    #[error("MK_ERR_300: Malformed deposit payload: {reason}")]
    MalformedPayload { reason: String },

    // =================================================================
    // Arithmetic Errors (4xx)
    // =================================================================
    /// A credit would exceed the representable 256-bit range.
    #[error("MK_ERR_400: Arithmetic overflow: {context}")]
    Overflow { context: String },

    // =================================================================
    // Input Errors (5xx)
    // =================================================================
    /// A role identifier or name matched none of the known roles.
    #[error("MK_ERR_500: Unknown role: {0}")]
    UnknownRole(String),

    /// A human-readable amount could not be parsed.
    #[error("MK_ERR_501: Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// An account identifier could not be parsed.
    #[error("MK_ERR_502: Invalid account id '{0}'")]
    InvalidAccount(String),

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// Supply conservation invariant violated. Critical.
    #[error("MK_ERR_801: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("MK_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("MK_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("MK_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk).
    #[error("MK_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MilkError>;

impl From<std::io::Error> for MilkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MilkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
