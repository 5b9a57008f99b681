//! Cached, freshness-aware reads of a running game's state.
//!
//! A [`GameReader`] knows how to pull players, colours, tasks, HUD status and
//! session indicators out of the attached process. Those reads are expensive
//! and racy, so [`RefreshOrchestrator`] puts a TTL cache in front of each
//! category, serves coordinates through a cached pointer map, paces the
//! HUD heap scan with a [`ScanThrottle`] and classifies the session state.
//!
//! ```ignore
//! let view = RefreshOrchestrator::from_config(reader, &shipview_config::load_config(None)?.config)?;
//! let report = view.refresh_all(false);
//! for (category, failure) in &report.failed {
//!     eprintln!("{category}: {failure}");
//! }
//! println!("{}", view.map_name());
//! ```

pub mod classifier;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod reader;
pub mod throttle;
pub mod value;

pub use classifier::{Evidence, SessionClassifier, SessionReport, SessionSignals};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use orchestrator::{RefreshOrchestrator, RefreshReport};
pub use reader::GameReader;
pub use throttle::{PartialScan, ScanBudget, ScanOutcome, ScanThrottle};
pub use value::CategoryValue;

pub use shipview_cache::{Freshness, Lookup, ManualClock, SharedClock, SystemClock};
pub use shipview_types::{
    Category, ColorId, Handle, HudStatus, MapId, PlayerId, PlayerRecord, Position, ReadFailure,
    SessionProbe, SessionState, TaskRecord,
};
