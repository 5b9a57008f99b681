//! The memory-reading collaborator this crate caches in front of.

use std::collections::BTreeMap;

use shipview_cache::PointerMap;
use shipview_types::{
    ColorId, Handle, HudStatus, PlayerId, PlayerRecord, Position, ReadResult, SessionProbe,
    TaskRecord,
};

use crate::throttle::{PartialScan, ScanBudget};

/// Typed reads against the attached game process.
///
/// Implementations locate and decode the game's objects; this crate only
/// decides when to call them. Every read may fail transiently and must be
/// free of side effects so it can be repeated.
pub trait GameReader: Send + Sync {
    /// All players currently known to the game.
    fn read_players(&self) -> ReadResult<Vec<PlayerRecord>>;

    /// Colour of every player.
    fn read_colors(&self) -> ReadResult<BTreeMap<PlayerId, ColorId>>;

    /// Task lists for every player whose tasks are readable.
    fn read_tasks(&self) -> ReadResult<BTreeMap<PlayerId, Vec<TaskRecord>>>;

    /// Raw session indicators.
    fn read_session_probe(&self) -> ReadResult<SessionProbe>;

    /// Complete player-to-controller map. Either the whole map or an error.
    fn read_pointer_map(&self) -> ReadResult<PointerMap>;

    /// Coordinates of the controller behind `handle`.
    fn read_position(&self, handle: Handle) -> ReadResult<Position>;

    /// Cheap check that `handle` still points at a player controller.
    fn verify_handle(&self, _handle: Handle) -> bool {
        true
    }

    /// Search for the HUD report button within `budget`.
    fn scan_hud(&self, budget: &ScanBudget) -> PartialScan<HudStatus>;
}
