//! Lazily populated, never evicted map with at-most-once generation

use crate::error::{SecretsError, SecretsResult};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

/// Map whose entries are generated on first use and then shared.
///
/// Lookups take the read lock only. A miss takes the write lock and checks
/// again before generating, so racing callers on a cold key run the
/// generator once and all observe its result. Failed generation stores
/// nothing.
#[derive(Debug)]
pub struct GenerationStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> GenerationStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, without generating
    pub fn get(&self, key: &K) -> SecretsResult<Option<V>> {
        let entries = self.entries.read().map_err(|_| SecretsError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// Return the value for `key`, running `generate` on a genuine miss.
    ///
    /// `generate` runs under the write lock and may block other writers for
    /// its whole duration. Readers of populated keys are not affected once
    /// the write lock is released.
    pub fn get_or_try_insert_with<F>(&self, key: K, generate: F) -> SecretsResult<V>
    where
        F: FnOnce() -> SecretsResult<V>,
    {
        if let Some(value) = self.get(&key)? {
            return Ok(value);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| SecretsError::LockPoisoned)?;

        // Another writer may have filled the entry while we waited
        if let Some(value) = entries.get(&key) {
            return Ok(value.clone());
        }

        let value = generate()?;
        entries.insert(key, value.clone());
        Ok(value)
    }

    /// Number of stored entries.
    ///
    /// Entries are inserted only after generation succeeds, so a poisoned
    /// map is never half-written and its count is still exact.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for GenerationStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
