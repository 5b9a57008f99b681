//! Player-to-handle map for the fast coordinate path.
//!
//! The map is only ever replaced as a whole. Handles captured at different
//! instants may refer to different objects once the game reshuffles its
//! object graph, so a reader must never see a mix of two refreshes. Each
//! refresh builds a new map and publishes it with a single pointer swap;
//! readers hold an `Arc` to whichever generation they picked up.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use shipview_types::{Handle, PlayerId, ReadFailure, ReadResult};
use tracing::{debug, trace};

use crate::clock::SharedClock;
use crate::lookup::{Freshness, Lookup};
use crate::ttl::TtlTracker;

/// Mapping from player id to the handle of its controller object.
pub type PointerMap = HashMap<PlayerId, Handle>;

const NAME: &str = "pointer_map";

struct MapState {
    map: Arc<PointerMap>,
    ttl: TtlTracker,
    last_failure: Option<ReadFailure>,
    /// Start of the last forced rebuild, for [`PointerMapCache::rebuild`].
    last_rebuild: Option<Instant>,
}

impl MapState {
    fn freshness(&self, now: Instant) -> Freshness {
        if self.ttl.refreshed_at().is_none() {
            Freshness::NeverPopulated
        } else if self.last_failure.is_some() {
            Freshness::Stale
        } else if self.ttl.is_due(now) {
            Freshness::Expired
        } else {
            Freshness::Fresh
        }
    }

    fn lookup(&self, freshness: Freshness) -> Lookup<Arc<PointerMap>> {
        let value = self.ttl.refreshed_at().map(|_| Arc::clone(&self.map));
        Lookup::new(NAME, freshness)
            .with_value(value, self.ttl.refreshed_at())
            .with_failure(self.last_failure.clone())
    }
}

/// Cache of the whole player pointer map.
pub struct PointerMapCache {
    clock: SharedClock,
    state: RwLock<MapState>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}

impl PointerMapCache {
    pub fn new(ttl: Duration, clock: SharedClock) -> Self {
        Self {
            clock,
            state: RwLock::new(MapState {
                map: Arc::new(PointerMap::new()),
                ttl: TtlTracker::new(ttl),
                last_failure: None,
                last_rebuild: None,
            }),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.state.read().ttl.ttl()
    }

    pub fn set_ttl(&self, ttl: Duration) {
        self.state.write().ttl.set_ttl(ttl);
        debug!(ttl_ms = ttl.as_millis() as u64, "Pointer map TTL updated");
    }

    /// Whether the next [`ensure_fresh`](Self::ensure_fresh) would rebuild.
    /// An empty map is always due.
    pub fn is_due(&self) -> bool {
        let state = self.state.read();
        state.map.is_empty() || state.ttl.is_due(self.clock.now())
    }

    /// The current map generation, without refreshing.
    pub fn current(&self) -> Arc<PointerMap> {
        Arc::clone(&self.state.read().map)
    }

    /// Look up a handle in the current map, without refreshing.
    pub fn resolve(&self, id: PlayerId) -> Option<Handle> {
        self.state.read().map.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.state.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().map.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<Instant> {
        self.state.read().ttl.refreshed_at()
    }

    /// Failure of the most recent rebuild, cleared by the next success.
    pub fn last_failure(&self) -> Option<ReadFailure> {
        self.state.read().last_failure.clone()
    }

    /// Number of maps published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Rebuild the map through `fetch` if it is empty or past its TTL.
    pub fn ensure_fresh<F>(&self, fetch: F) -> Lookup<Arc<PointerMap>>
    where
        F: FnOnce() -> ReadResult<PointerMap>,
    {
        self.refresh_with(false, fetch)
    }

    /// Rebuild the map through `fetch` unconditionally.
    pub fn refresh<F>(&self, fetch: F) -> Lookup<Arc<PointerMap>>
    where
        F: FnOnce() -> ReadResult<PointerMap>,
    {
        self.refresh_with(true, fetch)
    }

    /// Force a rebuild, at most once per TTL window.
    ///
    /// Returns `None` without calling `fetch` when a forced rebuild already
    /// started less than one TTL ago.
    pub fn rebuild<F>(&self, fetch: F) -> Option<Lookup<Arc<PointerMap>>>
    where
        F: FnOnce() -> ReadResult<PointerMap>,
    {
        let _refresh = self.refresh_lock.lock();
        let now = self.clock.now();
        {
            let mut state = self.state.write();
            if let Some(last) = state.last_rebuild
                && now.saturating_duration_since(last) < state.ttl.ttl()
            {
                trace!("Pointer map rebuilt recently, skipping forced rebuild");
                return None;
            }
            state.last_rebuild = Some(now);
        }
        Some(self.fetch_and_publish(fetch))
    }

    fn refresh_with<F>(&self, force: bool, fetch: F) -> Lookup<Arc<PointerMap>>
    where
        F: FnOnce() -> ReadResult<PointerMap>,
    {
        if !force && !self.is_due() {
            trace!("Pointer map served from cache");
            return self.cached();
        }

        let _refresh = self.refresh_lock.lock();
        if !force && !self.is_due() {
            return self.cached();
        }

        self.fetch_and_publish(fetch)
    }

    fn cached(&self) -> Lookup<Arc<PointerMap>> {
        let state = self.state.read();
        state.lookup(state.freshness(self.clock.now()))
    }

    /// Call `fetch` and publish its map. The refresh lock must be held.
    fn fetch_and_publish<F>(&self, fetch: F) -> Lookup<Arc<PointerMap>>
    where
        F: FnOnce() -> ReadResult<PointerMap>,
    {
        let result = fetch();
        let now = self.clock.now();
        let mut state = self.state.write();

        match result {
            // Mid-transition reads can come back empty; the old handles are
            // still the best guess
            Ok(map) if map.is_empty() => {
                debug!(
                    previous = state.map.len(),
                    "Pointer map read was empty, keeping previous map"
                );
                state.lookup(state.freshness(now)).fetched(true)
            }
            Ok(map) => {
                let size = map.len();
                state.map = Arc::new(map);
                state.ttl.touch(now);
                state.last_failure = None;
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                debug!(players = size, generation, "Pointer map rebuilt");
                state.lookup(Freshness::Fresh).fetched(true)
            }
            Err(failure) => {
                debug!(error = %failure, "Pointer map rebuild failed, keeping previous map");
                state.last_failure = Some(failure);
                state.lookup(state.freshness(now)).fetched(true)
            }
        }
    }

    /// Drop the whole map. The next fast-path read rebuilds it.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.map = Arc::new(PointerMap::new());
        state.ttl.clear();
        state.last_failure = None;
        state.last_rebuild = None;
        debug!("Pointer map invalidated");
    }
}
