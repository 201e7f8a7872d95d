//! Ledger configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AccountId, MilkError, Result, Role, constants};

/// A role assignment applied by the administrator at genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: Role,
    pub account: AccountId,
}

/// Configuration for a single ledger instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Token name (e.g., "Milk Token").
    pub name: String,
    /// Token symbol (e.g., "MTK").
    pub symbol: String,
    /// Display decimals; base units are `10^-decimals` tokens.
    pub decimals: u8,
    /// Account holding the implicit administrator role.
    pub admin: AccountId,
    /// The ledger's own account, used as the game reserve.
    pub ledger_account: AccountId,
    /// Roles granted by `admin` when the ledger is created.
    pub genesis_roles: Vec<RoleGrant>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_NAME.to_string(),
            symbol: constants::DEFAULT_SYMBOL.to_string(),
            decimals: constants::DEFAULT_DECIMALS,
            admin: AccountId::from_bytes(constants::DEFAULT_ADMIN_ACCOUNT),
            ledger_account: AccountId::from_bytes(constants::DEFAULT_LEDGER_ACCOUNT),
            genesis_roles: Vec::new(),
        }
    }
}

impl LedgerConfig {
    /// Default config with the given administrator and reserve accounts.
    #[must_use]
    pub fn with_accounts(admin: AccountId, ledger_account: AccountId) -> Self {
        Self {
            admin,
            ledger_account,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MilkError::Configuration(format!("invalid ledger config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations the ledger cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.admin == self.ledger_account {
            return Err(MilkError::Configuration(
                "admin and ledger_account must differ".into(),
            ));
        }
        if self.decimals > constants::MAX_DECIMALS {
            return Err(MilkError::Configuration(format!(
                "decimals {} exceeds maximum {}",
                self.decimals,
                constants::MAX_DECIMALS
            )));
        }
        if self.symbol.trim().is_empty() {
            return Err(MilkError::Configuration("symbol must not be empty".into()));
        }
        Ok(())
    }
}
