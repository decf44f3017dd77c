//! The in-memory recording history and its host filter.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::types::{Host, Item};

/// Append-only store of recorded request/response pairs for the lifetime of
/// the process.
///
/// Cheaply cloneable handle; clones share the same underlying store. Appends
/// take the write lock, filtering takes the read lock and hands back an owned
/// snapshot, so ranking never observes concurrent mutation. No deduplication,
/// no capacity bound, no eviction.
#[derive(Debug, Clone, Default)]
pub struct History {
    inner: Arc<RwLock<Vec<Arc<Item>>>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully formed recording. Items are immutable once stored.
    pub fn append(&self, item: Item) {
        let mut items = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(
            host = %item.host.value,
            method = %item.method,
            path = %item.path,
            total = items.len() + 1,
            "recording appended to history"
        );
        items.push(Arc::new(item));
    }

    /// Number of recordings currently stored.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every item recorded against `host`, in insertion order.
    ///
    /// An item qualifies when its host `value` equals the target's `value`
    /// or its host `ip` equals the target's `ip`. An empty result is a
    /// normal outcome, not an error.
    pub fn candidates_for(&self, host: &Host) -> Vec<Arc<Item>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|item| item.host.value == host.value || item.host.ip == host.ip)
            .cloned()
            .collect()
    }
}
