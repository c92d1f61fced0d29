//! In-memory keyed store with per-entry expiry.
//!
//! Backs wizard sessions (sliding expiry, refreshed on every write) and
//! share links (fixed expiry from creation).

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// A stored value with expiration time.
struct CacheEntry<T> {
    value: T,
    /// None when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Map of string keys to values that lapse after a TTL.
pub struct TtlStore<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    /// Whether writes push the expiry forward.
    sliding: bool,
}

impl<T: Clone> TtlStore<T> {
    /// Entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            sliding: false,
        }
    }

    /// Entries expire `ttl` after their last write.
    pub fn sliding(ttl: Duration) -> Self {
        Self {
            sliding: true,
            ..Self::new(ttl)
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a live value, or None if expired/missing.
    pub fn get(&self, key: &str) -> Option<T> {
        self.entries
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .get(key)
                    .filter(|e| !e.is_expired())
                    .map(|e| e.value.clone())
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|guard| guard.get(key).is_some_and(|e| !e.is_expired()))
            .unwrap_or(false)
    }

    pub fn insert(&self, key: String, value: T) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key, CacheEntry::new(value, self.ttl));
    }

    /// Mutate the value under `key`, starting from `T::default()` when the
    /// entry is missing or expired.
    pub fn upsert<R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> R
    where
        T: Default,
    {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = guard
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(T::default(), self.ttl));

        if entry.is_expired() {
            *entry = CacheEntry::new(T::default(), self.ttl);
        } else if self.sliding {
            entry.expires_at = Instant::now().checked_add(self.ttl);
        }

        f(&mut entry.value)
    }

    /// Drop expired entries, returning the keys that were removed.
    pub fn purge_expired(&self) -> Vec<String> {
        let Ok(mut guard) = self.entries.write() else {
            return Vec::new();
        };
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            guard.remove(key);
        }
        expired
    }
}
