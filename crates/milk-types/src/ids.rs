//! Account identifiers and movement endpoints.
//!
//! An [`AccountId`] is an opaque 20-byte key supplied by the execution
//! environment. Mint sources and burn sinks are never encoded as an account:
//! they are the [`Party::Null`] sentinel.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{MilkError, constants::ACCOUNT_ID_BYTES};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a ledger account (holder, role member, or the ledger itself).
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(pub [u8; ACCOUNT_ID_BYTES]);

impl AccountId {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_BYTES] {
        &self.0
    }

    /// First four bytes in hex, for compact log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Deterministic account derived from a seed. Test fixtures only.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let digest = alloy_primitives::keccak256(seed.to_be_bytes());
        let mut bytes = [0u8; ACCOUNT_ID_BYTES];
        bytes.copy_from_slice(&digest[32 - ACCOUNT_ID_BYTES..]);
        Self(bytes)
    }

    /// Random account. Test fixtures only.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; ACCOUNT_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = MilkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits).map_err(|_| MilkError::InvalidAccount(s.to_string()))?;
        let bytes: [u8; ACCOUNT_ID_BYTES] = raw
            .try_into()
            .map_err(|_| MilkError::InvalidAccount(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for AccountId {
    type Error = MilkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// One endpoint of a value movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// Mint-from-nothing source or burn-to-nothing sink.
    Null,
    /// A real ledger account.
    Account(AccountId),
}

impl Party {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The account behind this endpoint, if any.
    #[must_use]
    pub fn account(&self) -> Option<AccountId> {
        match self {
            Self::Null => None,
            Self::Account(id) => Some(*id),
        }
    }
}

impl From<AccountId> for Party {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Account(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
