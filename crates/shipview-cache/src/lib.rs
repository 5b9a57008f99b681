//! TTL caching for live process reads.
//!
//! This crate provides the storage half of shipview:
//! - [`CategoryCache`]: one value per data category, refreshed lazily or on
//!   demand, with stale-on-failure fallback
//! - [`PointerMapCache`]: the player-to-handle map behind the fast
//!   coordinate path, always replaced as a whole
//! - [`Clock`]: the monotonic time source every TTL check goes through
//!
//! # Example
//!
//! ```rust,ignore
//! use shipview_cache::{CategoryCache, SystemClock};
//!
//! let cache = CategoryCache::new("players", Duration::from_millis(150), Arc::new(SystemClock));
//! let lookup = cache.get_or_refresh(false, || reader.read_players());
//! ```

mod cache;
mod clock;
mod error;
mod lookup;
mod pointer_map;
mod ttl;

pub use cache::{CacheEntry, CacheStats, CategoryCache};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{Error, Result};
pub use lookup::{Freshness, Lookup};
pub use pointer_map::{PointerMap, PointerMapCache};
pub use ttl::TtlTracker;
