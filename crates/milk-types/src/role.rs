//! Privilege tiers and their fixed 32-byte identifiers.
//!
//! Role ids follow the paired chain's access-control convention: the
//! keccak-256 hash of the role's ASCII name, with the administrator role
//! being the all-zero word.

use std::{fmt, str::FromStr};

use alloy_primitives::{B256, keccak256};
use serde::{Deserialize, Serialize};

use crate::MilkError;

/// Fixed-size identifier of a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RoleId(pub B256);

impl RoleId {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A privilege tier. Membership is checked per call and never inherited:
/// holding [`Role::Admin`] does not grant any other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Implicit administrator; may grant and revoke roles.
    Admin,
    /// Bridge relayer; may credit deposits from the paired chain.
    Depositor,
    /// Trusted game contract; may mint, burn, move, and withdraw game value.
    Contract,
    /// Assignable but gates no operation.
    Master,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Depositor, Role::Contract, Role::Master];

    /// Canonical name hashed into the role id.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "DEFAULT_ADMIN_ROLE",
            Self::Depositor => "DEPOSITOR_ROLE",
            Self::Contract => "CONTRACT_ROLE",
            Self::Master => "MASTER_ROLE",
        }
    }

    #[must_use]
    pub fn id(&self) -> RoleId {
        match self {
            Self::Admin => RoleId(B256::ZERO),
            other => RoleId(keccak256(other.name().as_bytes())),
        }
    }

    /// Reverse lookup from a role id.
    pub fn from_id(id: RoleId) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.id() == id)
            .ok_or_else(|| MilkError::UnknownRole(id.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the canonical name (`DEPOSITOR_ROLE`), the short form
/// (`depositor`), or a `0x`-prefixed role id.
impl FromStr for Role {
    type Err = MilkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x") {
            let raw = hex::decode(digits).map_err(|_| MilkError::UnknownRole(s.to_string()))?;
            let word: [u8; 32] = raw
                .try_into()
                .map_err(|_| MilkError::UnknownRole(s.to_string()))?;
            return Self::from_id(RoleId(B256::from(word)));
        }

        let upper = s.to_ascii_uppercase();
        let short = upper.strip_suffix("_ROLE").unwrap_or(&upper);
        match short {
            "DEFAULT_ADMIN" | "ADMIN" => Ok(Self::Admin),
            "DEPOSITOR" => Ok(Self::Depositor),
            "CONTRACT" => Ok(Self::Contract),
            "MASTER" => Ok(Self::Master),
            _ => Err(MilkError::UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_are_keccak_of_names() {
        assert_eq!(
            Role::Depositor.id(),
            RoleId(keccak256(b"DEPOSITOR_ROLE"))
        );
        assert_eq!(Role::Contract.id(), RoleId(keccak256(b"CONTRACT_ROLE")));
        assert_eq!(Role::Master.id(), RoleId(keccak256(b"MASTER_ROLE")));
        assert_eq!(Role::Admin.id(), RoleId(B256::ZERO));
    }

    #[test]
    fn role_ids_are_distinct() {
        for a in Role::ALL {
            for b in Role::ALL {
                if a != b {
                    assert_ne!(a.id(), b.id(), "{a} and {b} collide");
                }
            }
        }
    }

    #[test]
    fn from_id_roundtrips_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()).unwrap(), role);
        }
        let unknown = RoleId(keccak256(b"JANITOR_ROLE"));
        assert!(matches!(
            Role::from_id(unknown),
            Err(MilkError::UnknownRole(_))
        ));
    }

    #[test]
    fn parse_names_short_forms_and_ids() {
        assert_eq!("DEPOSITOR_ROLE".parse::<Role>().unwrap(), Role::Depositor);
        assert_eq!("contract".parse::<Role>().unwrap(), Role::Contract);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        let id = Role::Master.id().to_string();
        assert_eq!(id.parse::<Role>().unwrap(), Role::Master);
        assert!("owner".parse::<Role>().is_err());
        assert!("0x1234".parse::<Role>().is_err());
    }

    #[test]
    fn role_id_display_is_full_word() {
        let s = Role::Admin.id().to_string();
        assert_eq!(s, format!("0x{}", "0".repeat(64)));
    }

    #[test]
    fn role_serde_uses_short_names() {
        let json = serde_json::to_string(&Role::Depositor).unwrap();
        assert_eq!(json, "\"DEPOSITOR\"");
        let back: Role = serde_json::from_str("\"CONTRACT\"").unwrap();
        assert_eq!(back, Role::Contract);
    }
}
