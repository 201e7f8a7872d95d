//! Role membership table.
//!
//! A many-to-many relation between identities and roles. Membership is
//! checked per call and never inherited.

use std::collections::{BTreeSet, HashMap};

use milk_types::{AccountId, MilkError, Result, Role};

/// Tracks which accounts hold which [`Role`].
#[derive(Debug, Default)]
pub struct RoleRegistry {
    members: HashMap<Role, BTreeSet<AccountId>>,
}

impl RoleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `account` to `role`. Returns `false` if it was already a member.
    pub fn grant(&mut self, role: Role, account: AccountId) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    /// Remove `account` from `role`. Returns `false` if it was not a member.
    pub fn revoke(&mut self, role: Role, account: AccountId) -> bool {
        let Some(set) = self.members.get_mut(&role) else {
            return false;
        };
        let removed = set.remove(&account);
        if set.is_empty() {
            self.members.remove(&role);
        }
        removed
    }

    #[must_use]
    pub fn has_role(&self, role: Role, account: AccountId) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(&account))
    }

    /// Gate check.
    ///
    /// # Errors
    /// Returns [`MilkError::Unauthorized`] naming the account and the role id.
    pub fn ensure(&self, role: Role, account: AccountId) -> Result<()> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(MilkError::Unauthorized {
                account,
                role: role.id(),
            })
        }
    }

    /// Members of a role in ascending account order.
    #[must_use]
    pub fn members(&self, role: Role) -> Vec<AccountId> {
        self.members
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every role held by `account`.
    #[must_use]
    pub fn roles_of(&self, account: AccountId) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_role(*role, account))
            .collect()
    }
}
