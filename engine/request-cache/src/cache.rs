use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::CacheConfig;

/// How long a stored value stays fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    After(Duration),
    /// Immutable data (e.g. a finished day's box scores)
    Never,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    /// Callers that joined a producer already in flight
    pub deduplicated: u64,
    pub errors: u64,
    /// Producers currently in flight
    pub active: usize,
    pub entries: usize,
}

/// Build a request fingerprint such as `daily_stats:2024-06-01`
pub fn fingerprint<I, P>(namespace: &str, parts: I) -> String
where
    I: IntoIterator<Item = P>,
    P: Display,
{
    let mut key = namespace.to_string();
    for part in parts {
        key.push(':');
        key.push_str(&part.to_string());
    }
    key
}

type SharedProducer<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

struct CachedValue<V> {
    value: V,
    stored_at: Instant,
    expiry: Expiry,
}

impl<V> CachedValue<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        match self.expiry {
            Expiry::Never => true,
            Expiry::After(ttl) => now.duration_since(self.stored_at) < ttl,
        }
    }
}

struct PendingRequest<V, E> {
    request_id: u64,
    future: SharedProducer<V, E>,
}

#[derive(Default)]
struct Counters {
    total_requests: u64,
    hits: u64,
    misses: u64,
    deduplicated: u64,
    errors: u64,
}

struct CacheState<V, E> {
    entries: HashMap<String, CachedValue<V>>,
    pending: HashMap<String, PendingRequest<V, E>>,
    /// Bumped by `clear()`; producers from an older generation never store
    generation: u64,
    next_request_id: u64,
    counters: Counters,
}

impl<V: Clone, E> CacheState<V, E> {
    fn settle(
        &mut self,
        key: &str,
        request_id: u64,
        generation: u64,
        expiry: Expiry,
        result: &Result<V, E>,
        max_entries: usize,
    ) {
        if self.pending.get(key).map(|p| p.request_id) == Some(request_id) {
            self.pending.remove(key);
        }

        match result {
            Ok(value) => {
                if generation != self.generation {
                    debug!("Discarding result for key {} produced before a clear", key);
                    return;
                }
                self.evict_for(key, max_entries);
                self.entries.insert(
                    key.to_string(),
                    CachedValue { value: value.clone(), stored_at: Instant::now(), expiry },
                );
                debug!("Cached value for key: {}", key);
            }
            Err(_) => {
                self.counters.errors += 1;
                debug!("Producer for key {} failed; not cached", key);
            }
        }
    }

    fn evict_for(&mut self, key: &str, max_entries: usize) {
        if max_entries == 0 || self.entries.contains_key(key) {
            return;
        }

        let mut removed = 0;
        while self.entries.len() >= max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, cached)| cached.stored_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    self.entries.remove(&k);
                    removed += 1;
                }
                None => break,
            }
        }

        if removed > 0 {
            debug!("Cache size limit reached, evicted {} old entries", removed);
        }
    }
}

/// Memoizing cache with at-most-one in-flight producer per key
///
/// Cloning yields another handle onto the same storage.
pub struct RequestCache<V, E> {
    config: CacheConfig,
    state: Arc<Mutex<CacheState<V, E>>>,
}

impl<V, E> Clone for RequestCache<V, E> {
    fn clone(&self) -> Self {
        Self { config: self.config.clone(), state: Arc::clone(&self.state) }
    }
}

impl<V, E> RequestCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        let state = CacheState {
            entries: HashMap::new(),
            pending: HashMap::new(),
            generation: 0,
            next_request_id: 0,
            counters: Counters::default(),
        };
        Self { config, state: Arc::new(Mutex::new(state)) }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached value for `key`, joining or starting a producer if needed.
    /// Values live for the configured default TTL.
    pub async fn fetch_or_compute<F, Fut>(&self, key: impl Into<String>, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let expiry = Expiry::After(self.config.default_ttl());
        self.fetch_or_compute_with(key, expiry, producer).await
    }

    /// As [`fetch_or_compute`](Self::fetch_or_compute) with an explicit expiry
    pub async fn fetch_or_compute_with<F, Fut>(
        &self,
        key: impl Into<String>,
        expiry: Expiry,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let key = key.into();

        let future = {
            let mut state = self.state.lock();
            state.counters.total_requests += 1;

            let now = Instant::now();
            let fresh = state.entries.get(&key).filter(|c| c.is_fresh(now)).map(|c| c.value.clone());
            if let Some(value) = fresh {
                state.counters.hits += 1;
                debug!("Cache hit for key: {}", key);
                return Ok(value);
            }

            if let Some(pending) = state.pending.get(&key) {
                let future = pending.future.clone();
                state.counters.deduplicated += 1;
                debug!("Joining in-flight request for key: {}", key);
                future
            } else {
                state.counters.misses += 1;
                state.entries.remove(&key);
                debug!("Cache miss for key: {}", key);

                let request_id = state.next_request_id;
                state.next_request_id += 1;
                let generation = state.generation;

                let future = self.wrap_producer(key.clone(), request_id, generation, expiry, producer);
                state.pending.insert(key.clone(), PendingRequest { request_id, future: future.clone() });
                future
            }
        };

        future.await
    }

    fn wrap_producer<F, Fut>(
        &self,
        key: String,
        request_id: u64,
        generation: u64,
        expiry: Expiry,
        producer: F,
    ) -> SharedProducer<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let state: Weak<Mutex<CacheState<V, E>>> = Arc::downgrade(&self.state);
        let max_entries = self.config.max_entries;

        async move {
            let result = producer().await;
            if let Some(state) = state.upgrade() {
                state.lock().settle(&key, request_id, generation, expiry, &result, max_entries);
            }
            result
        }
        .boxed()
        .shared()
    }

    /// Fresh value for `key` without starting a producer
    pub fn get(&self, key: &str) -> Option<V> {
        let state = self.state.lock();
        let now = Instant::now();
        state.entries.get(key).filter(|c| c.is_fresh(now)).map(|c| c.value.clone())
    }

    /// Drop one stored value; returns whether it existed
    pub fn invalidate(&self, key: &str) -> bool {
        self.state.lock().entries.remove(key).is_some()
    }

    /// Drop expired entries
    pub fn purge_expired(&self) -> usize {
        let mut state = self.state.lock();
        let now = Instant::now();
        let before = state.entries.len();
        state.entries.retain(|_, cached| cached.is_fresh(now));
        let removed = before - state.entries.len();
        if removed > 0 {
            info!("Cleared {} expired cache entries", removed);
        }
        removed
    }

    /// Wipe stored values and the in-flight registry.
    ///
    /// Producers already running still resolve for their waiters but their
    /// results are not stored.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let entries = state.entries.len();
        let pending = state.pending.len();
        state.entries.clear();
        state.pending.clear();
        state.generation += 1;
        info!("Cache cleared ({} entries, {} in-flight requests dropped)", entries, pending);
    }

    /// Counter snapshot
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            total_requests: state.counters.total_requests,
            hits: state.counters.hits,
            misses: state.counters.misses,
            deduplicated: state.counters.deduplicated,
            errors: state.counters.errors,
            active: state.pending.len(),
            entries: state.entries.len(),
        }
    }
}
