//! Emitted ledger events.
//!
//! Every balance change produces a [`MovementRecord`], the three-field
//! `(from, to, amount)` record consumed by off-ledger observers such as a
//! bridge watcher. Role and allowance changes are logged alongside as other
//! [`LedgerEvent`] kinds but are not movements.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, Party, Role};

/// A single value movement between two (possibly sentinel) endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub from: Party,
    pub to: Party,
    pub amount: Amount,
}

impl MovementRecord {
    /// Value created for `to` (null → to).
    #[must_use]
    pub fn mint(to: AccountId, amount: Amount) -> Self {
        Self {
            from: Party::Null,
            to: Party::Account(to),
            amount,
        }
    }

    /// Value destroyed from `from` (from → null).
    #[must_use]
    pub fn burn(from: AccountId, amount: Amount) -> Self {
        Self {
            from: Party::Account(from),
            to: Party::Null,
            amount,
        }
    }

    /// Value moved between two accounts.
    #[must_use]
    pub fn transfer(from: AccountId, to: AccountId, amount: Amount) -> Self {
        Self {
            from: Party::Account(from),
            to: Party::Account(to),
            amount,
        }
    }

    #[must_use]
    pub fn is_mint(&self) -> bool {
        self.from.is_null()
    }

    #[must_use]
    pub fn is_burn(&self) -> bool {
        self.to.is_null()
    }
}

/// Everything the ledger appends to its event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A balance change.
    Transfer(MovementRecord),
    /// An allowance was set.
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    },
    /// `account` joined `role`; `sender` is the administrator who granted it.
    RoleGranted {
        role: Role,
        account: AccountId,
        sender: AccountId,
    },
    /// `account` left `role`.
    RoleRevoked {
        role: Role,
        account: AccountId,
        sender: AccountId,
    },
}

impl LedgerEvent {
    /// The movement carried by this event, if it is one.
    #[must_use]
    pub fn as_movement(&self) -> Option<&MovementRecord> {
        match self {
            Self::Transfer(record) => Some(record),
            _ => None,
        }
    }
}

/// An event together with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Zero-based, gap-free position.
    pub sequence: u64,
    pub event: LedgerEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn mint_and_burn_use_null_sentinel() {
        let a = AccountId::from_seed(1);
        let mint = MovementRecord::mint(a, U256::from(5u64));
        assert!(mint.is_mint());
        assert!(!mint.is_burn());
        assert_eq!(mint.to, Party::Account(a));

        let burn = MovementRecord::burn(a, U256::from(5u64));
        assert!(burn.is_burn());
        assert!(!burn.is_mint());
    }

    #[test]
    fn transfer_is_neither_mint_nor_burn() {
        let rec = MovementRecord::transfer(
            AccountId::from_seed(1),
            AccountId::from_seed(2),
            U256::from(1u64),
        );
        assert!(!rec.is_mint());
        assert!(!rec.is_burn());
    }

    #[test]
    fn only_transfers_are_movements() {
        let a = AccountId::from_seed(1);
        let transfer = LedgerEvent::Transfer(MovementRecord::mint(a, U256::from(1u64)));
        assert!(transfer.as_movement().is_some());

        let granted = LedgerEvent::RoleGranted {
            role: Role::Contract,
            account: a,
            sender: AccountId::from_seed(0),
        };
        assert!(granted.as_movement().is_none());
    }

    #[test]
    fn event_json_is_tagged() {
        let a = AccountId::from_seed(9);
        let event = LedgerEvent::Transfer(MovementRecord::mint(a, U256::from(7u64)));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], "transfer");
        assert_eq!(value["from"], "null");
        assert_eq!(value["to"]["account"], a.to_string());

        let back: LedgerEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }
}
