//! In-memory response cache with TTL and bounded size.
//!
//! Entries expire after the configured TTL and are dropped on read. When the
//! cache is full the oldest entry is evicted to make room. Only successful
//! responses are stored; callers decide what to insert.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::CacheSettings;

struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub max_entries: usize,
}

/// TTL cache keyed by string.
#[derive(Clone)]
pub struct ResponseCache<T> {
    name: &'static str,
    ttl: Duration,
    max_entries: usize,
    entries: Arc<RwLock<HashMap<String, CacheEntry<T>>>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(name: &'static str, settings: CacheSettings) -> Self {
        Self {
            name,
            ttl: settings.ttl,
            max_entries: settings.max_entries,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_entries > 0
    }

    /// Get a fresh value, removing it if it has expired.
    pub async fn get(&self, key: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => {
                    debug!(cache = self.name, key, "Cache miss");
                    return None;
                }
                Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                    debug!(cache = self.name, key, "Cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.inserted_at.elapsed() > self.ttl)
        {
            entries.remove(key);
            debug!(cache = self.name, key, "Cache entry expired");
        }
        None
    }

    /// Store a value, evicting the oldest entry when full.
    pub async fn insert(&self, key: impl Into<String>, value: T) {
        if !self.is_enabled() {
            return;
        }

        let key = key.into();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                debug!(cache = self.name, key = %oldest, "Evicted oldest cache entry");
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove every expired entry, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(cache = self.name, removed, "Purged expired cache entries");
        }
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            total_entries: entries.len(),
            expired_entries: entries
                .values()
                .filter(|entry| entry.inserted_at.elapsed() > self.ttl)
                .count(),
            max_entries: self.max_entries,
        }
    }
}
