//! Identity-keyed per-target state
//!
//! Entries hold only weak references to their target. The application either
//! releases a target explicitly or lets `prune` collect entries whose target
//! has already been dropped.

use super::{TargetHandle, TargetId, WeakTarget};
use std::collections::HashMap;

struct Entry<V> {
    target: WeakTarget,
    value: V,
}

pub struct TargetRegistry<V> {
    entries: HashMap<TargetId, Entry<V>>,
}

impl<V> Default for TargetRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TargetRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Value stored for `target`, if any.
    pub fn get(&self, target: &TargetHandle) -> Option<&V> {
        self.entries.get(&target.id()).map(|e| &e.value)
    }

    /// Mutable access to the value stored for `target`.
    pub fn get_mut(&mut self, target: &TargetHandle) -> Option<&mut V> {
        self.entries.get_mut(&target.id()).map(|e| &mut e.value)
    }

    /// Value for `target`, inserting `init()` on first use.
    pub fn get_or_insert_with<F>(&mut self, target: &TargetHandle, init: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        &mut self
            .entries
            .entry(target.id())
            .or_insert_with(|| Entry {
                target: target.downgrade(),
                value: init(),
            })
            .value
    }

    /// Whether `target` has an entry, alive or not.
    pub fn contains(&self, target: &TargetHandle) -> bool {
        self.entries.contains_key(&target.id())
    }

    /// Forget the state kept for `target`.
    pub fn release(&mut self, target: &TargetHandle) -> Option<V> {
        self.entries.remove(&target.id()).map(|e| e.value)
    }

    /// Drop entries whose target no longer exists. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.target.is_alive());
        before - self.entries.len()
    }

    /// Live targets currently holding state.
    pub fn targets(&self) -> Vec<TargetHandle> {
        self.entries
            .values()
            .filter_map(|e| e.target.upgrade())
            .collect()
    }

    /// Number of entries, including ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
