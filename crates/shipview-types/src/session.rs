//! Session vocabulary: coarse states, maps and the raw probe.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse state of the local client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Lobby,
    Matching,
    Ship,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Lobby => "LOBBY",
            SessionState::Matching => "MATCHING",
            SessionState::Ship => "SHIP",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playable maps, identified by the ship-status type the game instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapId {
    Skeld,
    Mira,
    Polus,
    Airship,
    Fungle,
}

impl MapId {
    /// Resolve a ship-status type name (e.g. `PolusShipStatus`).
    pub fn from_ship_status_type(type_name: &str) -> Option<Self> {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "skeldshipstatus" => Some(MapId::Skeld),
            "mirashipstatus" => Some(MapId::Mira),
            "polusshipstatus" => Some(MapId::Polus),
            "airshipstatus" => Some(MapId::Airship),
            "fungleshipstatus" => Some(MapId::Fungle),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapId::Skeld => "SKELD",
            MapId::Mira => "MIRA",
            MapId::Polus => "POLUS",
            MapId::Airship => "AIRSHIP",
            MapId::Fungle => "FUNGLE",
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw session indicators as reported by the collaborator.
///
/// Every field is independently optional: `None` means the collaborator
/// could not determine it on this read, not that it is false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionProbe {
    /// A ship/gameplay context (ship status object with placed players) exists.
    pub ship_active: Option<bool>,
    /// The client has joined a room and is waiting for the game to start.
    pub matching_active: Option<bool>,
    /// Lobby-only UI (game creation, map picker) is instantiated.
    pub lobby_ui_present: Option<bool>,
    pub local_player_present: Option<bool>,
    pub game_data_present: Option<bool>,
    pub map: Option<MapId>,
}
