//! Single-category cache with TTL and stale-on-failure fallback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use shipview_types::{ReadFailure, ReadResult};
use tracing::{debug, trace};

use crate::clock::SharedClock;
use crate::lookup::{Freshness, Lookup};
use crate::ttl::TtlTracker;

/// Point-in-time copy of a cache entry.
///
/// `value` and `refreshed_at` are always both present or both absent.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: Option<T>,
    pub refreshed_at: Option<Instant>,
    pub last_failure: Option<ReadFailure>,
}

/// Inner state protected by RwLock.
struct CacheInner<T> {
    value: Option<T>,
    ttl: TtlTracker,
    last_failure: Option<ReadFailure>,
}

impl<T: Clone> CacheInner<T> {
    fn freshness(&self, now: Instant) -> Freshness {
        if self.value.is_none() {
            Freshness::NeverPopulated
        } else if self.last_failure.is_some() {
            Freshness::Stale
        } else if self.ttl.is_due(now) {
            Freshness::Expired
        } else {
            Freshness::Fresh
        }
    }

    fn lookup(&self, name: &'static str, now: Instant) -> Lookup<T> {
        Lookup::new(name, self.freshness(now))
            .with_value(self.value.clone(), self.ttl.refreshed_at())
            .with_failure(self.last_failure.clone())
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    refreshes: AtomicU64,
    failures: AtomicU64,
    invalidations: AtomicU64,
}

/// Cache for one data category.
///
/// This cache provides:
/// - Lazy refresh once the TTL has elapsed, or forced refresh on demand
/// - Stale-on-failure: a failed read never discards the previous value
/// - At most one in-flight refresh; concurrent callers wait and reuse it
/// - Non-refreshing reads that never wait on an in-flight fetch
pub struct CategoryCache<T> {
    name: &'static str,
    clock: SharedClock,
    inner: RwLock<CacheInner<T>>,
    refresh_lock: Mutex<()>,
    counters: Counters,
}

impl<T: Clone> CategoryCache<T> {
    /// Create an empty cache.
    pub fn new(name: &'static str, ttl: Duration, clock: SharedClock) -> Self {
        Self {
            name,
            clock,
            inner: RwLock::new(CacheInner {
                value: None,
                ttl: TtlTracker::new(ttl),
                last_failure: None,
            }),
            refresh_lock: Mutex::new(()),
            counters: Counters::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.inner.read().ttl.ttl()
    }

    /// Update the TTL. Takes effect on the next freshness check; the cached
    /// value is kept.
    pub fn set_ttl(&self, ttl: Duration) {
        self.inner.write().ttl.set_ttl(ttl);
        debug!(category = self.name, ttl_ms = ttl.as_millis() as u64, "TTL updated");
    }

    /// Whether the next non-forced access would call the collaborator.
    pub fn is_due(&self) -> bool {
        let inner = self.inner.read();
        inner.value.is_none() || inner.ttl.is_due(self.clock.now())
    }

    /// Return the cached value, refreshing it through `fetch` first if
    /// `force` is set, nothing is cached, or the TTL has elapsed.
    ///
    /// A failed fetch leaves the entry untouched: the previous value comes
    /// back as [`Freshness::Stale`], or nothing as
    /// [`Freshness::NeverPopulated`].
    pub fn get_or_refresh<F>(&self, force: bool, fetch: F) -> Lookup<T>
    where
        F: FnOnce() -> ReadResult<T>,
    {
        self.get_or_refresh_with(force, || Some(fetch()))
    }

    /// Like [`get_or_refresh`](Self::get_or_refresh), but `fetch` may decline
    /// by returning `None`. A declined refresh touches nothing: the cached
    /// entry comes back as it is, with its own age and freshness, and
    /// `fetched` unset.
    pub fn get_or_refresh_with<F>(&self, force: bool, fetch: F) -> Lookup<T>
    where
        F: FnOnce() -> Option<ReadResult<T>>,
    {
        if !force
            && let Some(hit) = self.cached_if_current()
        {
            return hit;
        }

        let _refresh = self.refresh_lock.lock();

        // Another caller may have refreshed while we waited for the lock
        if !force
            && let Some(hit) = self.cached_if_current()
        {
            return hit;
        }

        trace!(category = self.name, force, "Refreshing category");
        let Some(result) = fetch() else {
            trace!(category = self.name, "Refresh declined, serving cached entry");
            return self.peek();
        };
        let now = self.clock.now();
        let mut inner = self.inner.write();

        match result {
            Ok(value) => {
                inner.value = Some(value.clone());
                inner.ttl.touch(now);
                inner.last_failure = None;
                self.counters.refreshes.fetch_add(1, Ordering::Relaxed);
                debug!(category = self.name, "Category refreshed");

                Lookup::new(self.name, Freshness::Fresh)
                    .with_value(Some(value), Some(now))
                    .fetched(true)
            }
            Err(failure) => {
                inner.last_failure = Some(failure.clone());
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                debug!(
                    category = self.name,
                    error = %failure,
                    has_previous = inner.value.is_some(),
                    "Category refresh failed, keeping previous value"
                );

                let freshness = if inner.value.is_some() {
                    Freshness::Stale
                } else {
                    Freshness::NeverPopulated
                };
                Lookup::new(self.name, freshness)
                    .with_value(inner.value.clone(), inner.ttl.refreshed_at())
                    .with_failure(Some(failure))
                    .fetched(true)
            }
        }
    }

    fn cached_if_current(&self) -> Option<Lookup<T>> {
        let inner = self.inner.read();
        let now = self.clock.now();
        if inner.value.is_none() || inner.ttl.is_due(now) {
            return None;
        }
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        trace!(category = self.name, "Category served from cache");
        Some(inner.lookup(self.name, now))
    }

    /// Read the cached value without refreshing, whatever its age.
    pub fn peek(&self) -> Lookup<T> {
        self.inner.read().lookup(self.name, self.clock.now())
    }

    /// Failure of the most recent read, cleared by the next success or an
    /// invalidation.
    pub fn last_failure(&self) -> Option<ReadFailure> {
        self.inner.read().last_failure.clone()
    }

    /// Copy of the raw entry.
    pub fn entry(&self) -> CacheEntry<T> {
        let inner = self.inner.read();
        CacheEntry {
            value: inner.value.clone(),
            refreshed_at: inner.ttl.refreshed_at(),
            last_failure: inner.last_failure.clone(),
        }
    }

    /// Drop the cached value and its timestamp. The next access refreshes.
    pub fn invalidate(&self) {
        let mut inner = self.inner.write();
        inner.value = None;
        inner.ttl.clear();
        inner.last_failure = None;
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!(category = self.name, "Category invalidated");
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            refreshes: self.counters.refreshes.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from the cache without calling the collaborator.
    pub hits: u64,

    /// Successful collaborator reads.
    pub refreshes: u64,

    /// Failed collaborator reads.
    pub failures: u64,

    /// Explicit invalidations.
    pub invalidations: u64,
}
