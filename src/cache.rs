//! Process-lifetime memoizing cache with TTL expiry.
//!
//! Values are stored as postcard bytes so one cache instance can serve every
//! operation (weather series, environmental profiles, ...). Each key owns an
//! async lock: the first caller on a miss computes while later callers for the
//! same key wait and then read the stored value, so at most one computation
//! per key is ever in flight.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;

use crate::Result;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Longest gap between sweeps of stale keys (shorter when the default TTL is).
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Cache key: the operation identity plus its canonicalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    args: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(operation: &'static str, args: impl Into<String>) -> Self {
        Self {
            operation,
            args: args.into(),
        }
    }

    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.args)
    }
}

struct StoredEntry {
    bytes: Vec<u8>,
    created_at: Instant,
    ttl: Duration,
}

impl StoredEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) < self.ttl
    }
}

type Slot = Arc<AsyncMutex<Option<StoredEntry>>>;

/// Shared TTL cache. Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct Cache {
    slots: Arc<Mutex<HashMap<CacheKey, Slot>>>,
    last_sweep: Arc<Mutex<Instant>>,
    default_ttl: Duration,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("keys", &self.slots().len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl Cache {
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
            default_ttl,
        }
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // A poisoned map is still structurally valid; entries are replaced whole.
    fn slots(&self) -> MutexGuard<'_, HashMap<CacheKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        let mut slots = self.slots();
        if let Some(slot) = slots.get(key) {
            return slot.clone();
        }

        // New keys pay for sweeping old ones, so the map stays TTL-bounded
        self.sweep_if_due(&mut slots);
        let slot: Slot = Arc::new(AsyncMutex::new(None));
        slots.insert(key.clone(), slot.clone());
        slot
    }

    fn sweep_if_due(&self, slots: &mut HashMap<CacheKey, Slot>) {
        let now = Instant::now();
        let mut last_sweep = self.last_sweep.lock().unwrap_or_else(PoisonError::into_inner);
        if now.duration_since(*last_sweep) < self.default_ttl.min(SWEEP_INTERVAL) {
            return;
        }
        *last_sweep = now;

        let removed = retain_live(slots, now);
        if removed > 0 {
            tracing::debug!("Swept {} stale keys, {} remain", removed, slots.len());
        }
    }

    /// Returns the cached value for `key` if it is younger than its TTL,
    /// otherwise runs `compute`, stores its result and returns it.
    ///
    /// A failing `compute` leaves the key empty; the error is returned as-is.
    #[tracing::instrument(name = "cache_get_or_compute", level = "debug", skip(self, compute), fields(key = %key))]
    pub async fn get_or_compute<T, F, Fut>(&self, key: &CacheKey, ttl: Duration, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        match entry.as_ref() {
            Some(stored) if stored.is_fresh(Instant::now()) => {
                tracing::debug!("Key found and still fresh");
                return Ok(postcard::from_bytes(&stored.bytes)?);
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                *entry = None;
            }
            None => tracing::debug!("Key not found"),
        }

        let value = compute().await?;
        let bytes = postcard::to_stdvec(&value)?;
        *entry = Some(StoredEntry {
            bytes,
            created_at: Instant::now(),
            ttl,
        });
        debug_assert!(entry.as_ref().is_some_and(|e| e.is_fresh(Instant::now()) || ttl.is_zero()));

        Ok(value)
    }

    /// [`Cache::get_or_compute`] with the cache's default TTL.
    pub async fn get_or_compute_default<T, F, Fut>(&self, key: &CacheKey, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_compute(key, self.default_ttl, compute).await
    }

    /// Manually drops the value stored for `key`.
    pub async fn invalidate(&self, key: &CacheKey) {
        let slot = self.slots().get(key).cloned();
        if let Some(slot) = slot {
            *slot.lock().await = None;
        }
    }

    /// Drops every key that is neither fresh nor being computed.
    pub fn purge_expired(&self) -> usize {
        retain_live(&mut self.slots(), Instant::now())
    }

    /// Drops all keys.
    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Number of fresh entries not currently being recomputed.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots()
            .values()
            .filter(|slot| {
                slot.try_lock()
                    .is_ok_and(|entry| entry.as_ref().is_some_and(|e| e.is_fresh(now)))
            })
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps fresh slots and slots in use; returns how many were dropped.
fn retain_live(slots: &mut HashMap<CacheKey, Slot>, now: Instant) -> usize {
    let before = slots.len();
    slots.retain(|_, slot| {
        // Slots shared with a waiter or locked by a computation stay.
        if Arc::strong_count(slot) > 1 {
            return true;
        }
        match slot.try_lock() {
            Ok(entry) => entry.as_ref().is_some_and(|e| e.is_fresh(now)),
            Err(_) => true,
        }
    });
    before - slots.len()
}
