//! Per-character write locks.
//!
//! Use cases load a character, change it, and save it back. Holding the
//! character's lock across that sequence keeps two overlapping requests from
//! saving over each other's changes. Locks are per character, so edits to
//! different characters never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use sheetkeep_domain::CharacterId;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct CharacterLocks {
    locks: DashMap<CharacterId, Arc<Mutex<()>>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to one character. Access ends when
    /// the guard is dropped.
    pub async fn lock(&self, id: CharacterId) -> OwnedMutexGuard<()> {
        // The map entry guard must not live across the await
        let lock = self.locks.entry(id).or_default().clone();
        lock.lock_owned().await
    }

    /// Lock several characters at once, always in id order.
    pub async fn lock_all(
        &self,
        ids: impl IntoIterator<Item = CharacterId>,
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut ids: Vec<CharacterId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.lock(id).await);
        }
        guards
    }

    /// Drop the lock of a deleted character unless someone is waiting on it.
    pub fn forget(&self, id: CharacterId) {
        self.locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}
