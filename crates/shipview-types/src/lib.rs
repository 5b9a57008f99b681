//! Shared types for the shipview system.
//!
//! These are the records the memory-reading collaborator hands to the cache
//! layer, plus the small closed vocabularies (categories, session states)
//! the rest of the workspace is keyed on.

pub mod category;
pub mod error;
pub mod hud;
pub mod player;
pub mod session;
pub mod task;

pub use category::Category;
pub use error::{ReadFailure, ReadResult, UnknownCategory};
pub use hud::HudStatus;
pub use player::{ColorId, Handle, PlayerId, PlayerRecord, Position};
pub use session::{MapId, SessionProbe, SessionState};
pub use task::TaskRecord;
