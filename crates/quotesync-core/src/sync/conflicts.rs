//! Pending conflicts awaiting a manual decision.

use crate::error::{Error, Result};
use crate::models::{Conflict, Quote, Resolution};
use crate::store::QuoteStore;
use crate::util::now_millis;

/// Insertion-ordered queue holding at most one conflict per canonical key.
///
/// The queue lives only in memory; conflicts are re-detected on the next
/// cycle after a restart because the local quote is still dirty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictQueue {
    entries: Vec<Conflict>,
}

impl ConflictQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Queue a conflict.
    ///
    /// If a conflict for the same key is already pending its remote snapshot
    /// is refreshed in place and `false` is returned.
    pub fn enqueue(&mut self, conflict: Conflict) -> bool {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.key == conflict.key)
        {
            existing.remote = conflict.remote;
            return false;
        }
        self.entries.push(conflict);
        true
    }

    /// Apply a decision to the conflict at `index` and drop it from the queue.
    ///
    /// Returns the quote as it now stands in the store.
    pub fn resolve(
        &mut self,
        index: usize,
        resolution: Resolution,
        store: &mut QuoteStore,
    ) -> Result<Quote> {
        if index >= self.entries.len() {
            return Err(Error::ConflictNotFound(index));
        }
        let conflict = self.entries.remove(index);

        let resolved = match resolution {
            Resolution::KeepRemote => {
                let mut remote = conflict.remote;
                remote.dirty = false;
                remote.updated_at = now_millis();
                if !store.replace_at(&conflict.key, remote.clone()) {
                    store.add(remote.clone())?;
                }
                remote
            }
            Resolution::KeepLocal => {
                // Clearing dirty acknowledges the local copy so the next
                // cycle does not flag the same pair again.
                store.update_at(&conflict.key, |quote| quote.dirty = false);
                store.find_by_key(&conflict.key).cloned().unwrap_or(Quote {
                    dirty: false,
                    ..conflict.local
                })
            }
        };

        tracing::info!(
            key = %conflict.key,
            resolution = %resolution,
            "Resolved sync conflict"
        );
        Ok(resolved)
    }

    /// Pending conflicts in insertion order
    #[must_use]
    pub fn list(&self) -> &[Conflict] {
        &self.entries
    }

    /// Whether a conflict for `key` is pending
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn conflict_for(local: &Quote, remote_text: &str) -> Conflict {
        Conflict {
            key: local.canonical_key(),
            local: local.clone(),
            remote: Quote::from_remote(remote_text, local.category.clone(), None),
        }
    }

    fn dirty_store() -> (QuoteStore, Quote) {
        let mut store = QuoteStore::new();
        let local = store.add_local("Hello", "Life").unwrap();
        (store, local)
    }

    #[test]
    fn enqueue_keeps_one_entry_per_key() {
        let (_, local) = dirty_store();
        let mut queue = ConflictQueue::new();

        assert!(queue.enqueue(conflict_for(&local, "hello")));
        assert!(!queue.enqueue(conflict_for(&local, "HELLO")));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.list()[0].remote.text, "HELLO");
    }

    #[test]
    fn enqueue_preserves_insertion_order() {
        let mut store = QuoteStore::new();
        let first = store.add_local("One", "A").unwrap();
        let second = store.add_local("Two", "A").unwrap();
        let mut queue = ConflictQueue::new();

        queue.enqueue(conflict_for(&second, "two"));
        queue.enqueue(conflict_for(&first, "one"));
        assert_eq!(queue.list()[0].key, "two||a");
        assert_eq!(queue.list()[1].key, "one||a");
    }

    #[test]
    fn keep_remote_replaces_content_and_clears_dirty() {
        let (mut store, local) = dirty_store();
        let mut queue = ConflictQueue::new();
        queue.enqueue(conflict_for(&local, "hello"));

        let resolved = queue.resolve(0, Resolution::KeepRemote, &mut store).unwrap();

        assert_eq!(resolved.text, "hello");
        assert!(!resolved.dirty);
        assert_eq!(store.all()[0], resolved);
        assert_eq!(store.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn keep_local_keeps_content_and_clears_dirty() {
        let (mut store, local) = dirty_store();
        let mut queue = ConflictQueue::new();
        queue.enqueue(conflict_for(&local, "hello"));

        let resolved = queue.resolve(0, Resolution::KeepLocal, &mut store).unwrap();

        assert_eq!(resolved.text, "Hello");
        assert!(!resolved.dirty);
        assert!(!store.all()[0].dirty);
        assert!(queue.is_empty());
    }

    #[test]
    fn resolve_removes_exactly_one_entry() {
        let mut store = QuoteStore::new();
        let first = store.add_local("One", "A").unwrap();
        let second = store.add_local("Two", "A").unwrap();
        let mut queue = ConflictQueue::new();
        queue.enqueue(conflict_for(&first, "one"));
        queue.enqueue(conflict_for(&second, "two"));

        queue.resolve(1, Resolution::KeepLocal, &mut store).unwrap();
        assert_eq!(queue.len(), 1);
        assert!(queue.contains_key("one||a"));
        assert!(!queue.contains_key("two||a"));
    }

    #[test]
    fn resolve_out_of_range_is_error() {
        let (mut store, _) = dirty_store();
        let mut queue = ConflictQueue::new();
        assert!(matches!(
            queue.resolve(3, Resolution::KeepLocal, &mut store),
            Err(Error::ConflictNotFound(3))
        ));
    }
}
