//! Append-only event log with a SHA-256 hash chain.
//!
//! Each appended event extends the chain:
//! ```text
//! head' = SHA256(domain ‖ head ‖ sequence ‖ encode(event))
//! ```
//! Observers that mirror the log can compare heads to confirm they saw the
//! same history in the same order.

use milk_types::{LedgerEvent, LoggedEvent, MovementRecord, Party, constants};
use sha2::{Digest, Sha256};

/// Ordered record of everything the ledger emitted.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
    head: [u8; 32],
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and advance the hash chain.
    pub fn append(&mut self, event: LedgerEvent) -> &LoggedEvent {
        let sequence = self.entries.len() as u64;
        self.head = Self::link(&self.head, sequence, &event);
        self.entries.push(LoggedEvent { sequence, event });
        &self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    /// Movements only, in emission order.
    pub fn movements(&self) -> impl Iterator<Item = &MovementRecord> {
        self.entries.iter().filter_map(|e| e.event.as_movement())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current chain head. All zeros for an empty log.
    #[must_use]
    pub fn head_digest(&self) -> [u8; 32] {
        self.head
    }

    /// Recompute the chain from genesis and compare with the stored head.
    #[must_use]
    pub fn verify_chain(&self) -> bool {
        Self::replay_head(&self.entries) == self.head
    }

    /// Chain head produced by a sequence of logged events.
    #[must_use]
    pub fn replay_head(entries: &[LoggedEvent]) -> [u8; 32] {
        entries
            .iter()
            .fold([0u8; 32], |head, e| Self::link(&head, e.sequence, &e.event))
    }

    fn link(prev: &[u8; 32], sequence: u64, event: &LedgerEvent) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::EVENT_LOG_DOMAIN);
        hasher.update(prev);
        hasher.update(sequence.to_le_bytes());
        match event {
            LedgerEvent::Transfer(record) => {
                hasher.update([0u8]);
                hash_party(&mut hasher, record.from);
                hash_party(&mut hasher, record.to);
                hasher.update(record.amount.to_be_bytes::<32>());
            }
            LedgerEvent::Approval {
                owner,
                spender,
                amount,
            } => {
                hasher.update([1u8]);
                hasher.update(owner.as_bytes());
                hasher.update(spender.as_bytes());
                hasher.update(amount.to_be_bytes::<32>());
            }
            LedgerEvent::RoleGranted {
                role,
                account,
                sender,
            } => {
                hasher.update([2u8]);
                hasher.update(role.id().as_bytes());
                hasher.update(account.as_bytes());
                hasher.update(sender.as_bytes());
            }
            LedgerEvent::RoleRevoked {
                role,
                account,
                sender,
            } => {
                hasher.update([3u8]);
                hasher.update(role.id().as_bytes());
                hasher.update(account.as_bytes());
                hasher.update(sender.as_bytes());
            }
        }
        hasher.finalize().into()
    }
}

fn hash_party(hasher: &mut Sha256, party: Party) {
    match party {
        Party::Null => hasher.update([0u8]),
        Party::Account(id) => {
            hasher.update([1u8]);
            hasher.update(id.as_bytes());
        }
    }
}
