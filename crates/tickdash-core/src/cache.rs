//! In-memory memoization for provider results.
//!
//! Entries live for the whole process unless a TTL or a capacity bound is
//! configured. Only successful fetches are stored. Concurrent misses on the
//! same key share a single fetch.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{OnceCell, RwLock};

/// Defines how a single lookup interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read a live entry if present; otherwise fetch and store the result. (Default)
    #[default]
    Use,
    /// Always fetch, then overwrite any stored entry.
    Refresh,
    /// Always fetch; never read from or write to the cache.
    Bypass,
}

/// Expiry and size limits. The default is unbounded with no expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    pub ttl: Option<Duration>,
    /// Maximum number of stored keys; least recently used keys are evicted first.
    /// A capacity of zero behaves as one. Keys whose fetch is still running are
    /// never evicted, so the bound can be exceeded while those fetches finish.
    pub capacity: Option<usize>,
}

impl CacheConfig {
    pub const fn unbounded() -> Self {
        Self {
            ttl: None,
            capacity: None,
        }
    }

    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// Outcome of a memoized lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<V> {
    pub value: V,
    pub cache_hit: bool,
}

#[derive(Debug)]
struct Stored<V> {
    value: V,
    stored_at: Instant,
}

#[derive(Debug)]
struct Slot<V> {
    cell: Arc<OnceCell<Stored<V>>>,
    last_used: u64,
}

impl<V> Slot<V> {
    fn empty(tick: u64) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            last_used: tick,
        }
    }

    fn filled(value: V, tick: u64) -> Self {
        let stored = Stored {
            value,
            stored_at: Instant::now(),
        };
        Self {
            cell: Arc::new(OnceCell::new_with(Some(stored))),
            last_used: tick,
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match (ttl, self.cell.get()) {
            (Some(ttl), Some(stored)) => stored.stored_at.elapsed() > ttl,
            _ => false,
        }
    }
}

#[derive(Debug)]
struct CacheInner<K, V> {
    slots: HashMap<K, Slot<V>>,
    tick: u64,
}

impl<K: Eq + Hash + Clone, V> CacheInner<K, V> {
    fn next_tick(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    fn evict_over_capacity(&mut self, capacity: Option<usize>, keep: &K) {
        let Some(capacity) = capacity else {
            return;
        };
        while self.slots.len() > capacity.max(1) {
            let oldest = self
                .slots
                .iter()
                .filter(|(key, slot)| *key != keep && slot.cell.initialized())
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.slots.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Thread-safe memoization cache.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    inner: Arc<RwLock<CacheInner<K, V>>>,
    config: CacheConfig,
}

impl<K, V> Clone for MemoCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                slots: HashMap::new(),
                tick: 0,
            })),
            config,
        }
    }

    /// Return the live value for `key`, if any, without fetching.
    pub async fn get(&self, key: &K) -> Option<V> {
        let store = self.inner.read().await;
        store
            .slots
            .get(key)
            .filter(|slot| !slot.is_expired(self.config.ttl))
            .and_then(|slot| slot.cell.get())
            .map(|stored| stored.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: K, value: V) {
        let mut store = self.inner.write().await;
        let tick = store.next_tick();
        store.slots.insert(key.clone(), Slot::filled(value, tick));
        store.evict_over_capacity(self.config.capacity, &key);
    }

    /// Memoized fetch: consult the cache, call `fetch` on a miss and store a successful result.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        mode: CacheMode,
        fetch: F,
    ) -> Result<Lookup<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        match mode {
            CacheMode::Bypass => {
                let value = fetch().await?;
                Ok(Lookup {
                    value,
                    cache_hit: false,
                })
            }
            CacheMode::Refresh => {
                let value = fetch().await?;
                self.insert(key, value.clone()).await;
                Ok(Lookup {
                    value,
                    cache_hit: false,
                })
            }
            CacheMode::Use => self.use_or_fetch(key, fetch).await,
        }
    }

    async fn use_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<Lookup<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut store = self.inner.write().await;
            let tick = store.next_tick();
            let slot = store
                .slots
                .entry(key.clone())
                .or_insert_with(|| Slot::empty(tick));
            if slot.is_expired(self.config.ttl) {
                *slot = Slot::empty(tick);
            }
            slot.last_used = tick;
            let cell = Arc::clone(&slot.cell);
            store.evict_over_capacity(self.config.capacity, &key);
            cell
        };

        let fetched = AtomicBool::new(false);
        let fetched_ref = &fetched;
        let outcome = cell
            .get_or_try_init(move || async move {
                fetched_ref.store(true, Ordering::Relaxed);
                fetch().await.map(|value| Stored {
                    value,
                    stored_at: Instant::now(),
                })
            })
            .await;

        match outcome {
            Ok(stored) => Ok(Lookup {
                value: stored.value.clone(),
                cache_hit: !fetched.load(Ordering::Relaxed),
            }),
            Err(error) => {
                self.forget_empty(&key, &cell).await;
                Err(error)
            }
        }
    }

    async fn forget_empty(&self, key: &K, cell: &Arc<OnceCell<Stored<V>>>) {
        let mut store = self.inner.write().await;
        let unfilled = store
            .slots
            .get(key)
            .is_some_and(|slot| Arc::ptr_eq(&slot.cell, cell) && !slot.cell.initialized());
        if unfilled {
            store.slots.remove(key);
        }
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.slots.clear();
    }

    /// Number of stored values (including expired ones not yet cleared).
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store
            .slots
            .values()
            .filter(|slot| slot.cell.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
