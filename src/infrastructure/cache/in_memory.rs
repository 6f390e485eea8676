//! In-memory query cache with TTL expiry and a hard entry cap

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::cache::{QueryKey, SharedResult};

/// Configuration for the query cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCacheConfig {
    /// Lifetime of an entry measured from insertion
    pub ttl: Duration,
    /// Maximum number of live entries
    pub max_entries: usize,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(60_000),
            max_entries: 5,
        }
    }
}

impl QueryCacheConfig {
    /// Sets the lifetime of each entry
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the entry cap; zero disables caching
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
}

/// Cached result with its absolute expiry
struct CacheEntry<V: Clone> {
    result: SharedResult<V>,
    expires_at: Instant,
    /// Insertion order, breaks ties between equal expiries
    sequence: u64,
}

struct CacheTable<V: Clone> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    /// Unresolved results, joinable by identical lookups but not yet entries
    pending: HashMap<QueryKey, SharedResult<V>>,
    next_sequence: u64,
}

impl<V: Clone> CacheTable<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pending: HashMap::new(),
            next_sequence: 0,
        }
    }

    fn sweep(&mut self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);

        let expired = before - self.entries.len();

        if expired > 0 {
            tracing::debug!(expired, "Swept expired cache entries");
        }
    }

    /// Unregisters `result` unless a newer fetch has taken over the key
    fn release_pending(&mut self, key: &QueryKey, result: &SharedResult<V>) {
        if self
            .pending
            .get(key)
            .is_some_and(|pending| pending.ptr_eq(result))
        {
            self.pending.remove(key);
        }
    }

    fn evict_earliest(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.expires_at, entry.sequence))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            tracing::debug!(key = %key, "Evicted cache entry to make room");
        }
    }
}

/// Keeps a pending result registered while its store is in progress and
/// unregisters it if the store is dropped before finishing.
struct PendingRegistration<'a, V: Clone> {
    table: &'a Mutex<CacheTable<V>>,
    key: &'a QueryKey,
    result: SharedResult<V>,
    armed: bool,
}

impl<V: Clone> Drop for PendingRegistration<'_, V> {
    fn drop(&mut self) {
        if self.armed {
            self.table
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .release_pending(self.key, &self.result);
        }
    }
}

/// Deadline `duration` after `now`, saturating far in the future
pub(crate) fn deadline_after(now: Instant, duration: Duration) -> Instant {
    now.checked_add(duration)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30))
}

/// Bounded, time-limited memoization of shared fetch results.
///
/// Features:
/// - TTL per entry, swept lazily on every lookup and store
/// - earliest-expiry eviction once `max_entries` is reached
/// - outcomes are only kept when the caller's predicate accepts them
/// - identical lookups join a still-pending result instead of fetching again
pub struct InMemoryQueryCache<V: Clone> {
    table: Mutex<CacheTable<V>>,
    config: QueryCacheConfig,
}

impl<V: Clone> InMemoryQueryCache<V> {
    /// Creates a new cache with default configuration
    pub fn new() -> Self {
        Self::with_config(QueryCacheConfig::default())
    }

    pub fn with_config(config: QueryCacheConfig) -> Self {
        Self {
            table: Mutex::new(CacheTable::new()),
            config,
        }
    }

    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    fn table(&self) -> MutexGuard<'_, CacheTable<V>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live result for `key`, or the pending one if a fetch is in flight
    pub fn lookup(&self, key: &QueryKey) -> Option<SharedResult<V>> {
        let mut table = self.table();
        table.sweep(Instant::now());

        if let Some(entry) = table.entries.get(key) {
            tracing::debug!(key = %key, "Cache hit");
            return Some(entry.result.clone());
        }

        if let Some(pending) = table.pending.get(key) {
            tracing::debug!(key = %key, "Joining in-flight fetch");
            return Some(pending.clone());
        }

        tracing::debug!(key = %key, "Cache miss");
        None
    }

    /// Waits for `result` and keeps it under `key` if `should_cache` accepts the outcome.
    ///
    /// The resolved outcome is returned whether or not it was cached.
    pub async fn store<F>(&self, key: QueryKey, result: SharedResult<V>, should_cache: F) -> V
    where
        F: FnOnce(&V) -> bool,
    {
        self.table().pending.insert(key.clone(), result.clone());

        let mut registration = PendingRegistration {
            table: &self.table,
            key: &key,
            result: result.clone(),
            armed: true,
        };

        let outcome = result.clone().await;

        // Moving from pending to entries happens under one lock
        let mut table = self.table();
        registration.armed = false;
        drop(registration);
        table.release_pending(&key, &result);

        let now = Instant::now();
        table.sweep(now);

        if !should_cache(&outcome) {
            tracing::debug!(key = %key, "Outcome not cacheable, leaving key absent");
            return outcome;
        }

        if self.config.max_entries == 0 {
            tracing::debug!(key = %key, "Cache disabled by zero capacity");
            return outcome;
        }

        if !table.entries.contains_key(&key) && table.entries.len() >= self.config.max_entries {
            table.evict_earliest();
        }

        let sequence = table.next_sequence;
        table.next_sequence += 1;

        table.entries.insert(
            key.clone(),
            CacheEntry {
                result,
                expires_at: deadline_after(now, self.config.ttl),
                sequence,
            },
        );

        tracing::debug!(key = %key, entries = table.entries.len(), "Stored cache entry");

        outcome
    }

    /// Whether a live entry exists for `key`
    pub fn contains(&self, key: &QueryKey) -> bool {
        let mut table = self.table();
        table.sweep(Instant::now());
        table.entries.contains_key(key)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let mut table = self.table();
        table.sweep(Instant::now());
        table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry and pending result
    pub fn clear(&self) {
        let mut table = self.table();
        table.entries.clear();
        table.pending.clear();
    }
}

impl<V: Clone> fmt::Debug for InMemoryQueryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table();

        f.debug_struct("InMemoryQueryCache")
            .field("config", &self.config)
            .field("entries", &table.entries.len())
            .field("pending", &table.pending.len())
            .finish()
    }
}

impl<V: Clone> Default for InMemoryQueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
