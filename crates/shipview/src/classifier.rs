//! Coarse session-state classification.
//!
//! The signals the game exposes are noisy and often missing, so the
//! classifier is a fixed precedence list over tagged evidence rather than a
//! tree of conditionals. The first affirmed piece of evidence decides the
//! state; if none is affirmed the session is in the lobby. A missing signal
//! never affirms anything.

use serde::Serialize;
use shipview_types::{MapId, SessionProbe, SessionState};

/// Every signal the classifier may look at, each independently optional.
///
/// Only `ship_active` and `matching_active` decide the state; the rest are
/// carried for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSignals {
    pub ship_active: Option<bool>,
    pub matching_active: Option<bool>,
    pub lobby_ui_present: Option<bool>,
    pub local_player_present: Option<bool>,
    pub game_data_present: Option<bool>,
    pub hud_visible: Option<bool>,
    pub player_count: Option<usize>,
    pub map: Option<MapId>,
}

impl SessionSignals {
    pub fn from_probe(probe: SessionProbe) -> Self {
        Self {
            ship_active: probe.ship_active,
            matching_active: probe.matching_active,
            lobby_ui_present: probe.lobby_ui_present,
            local_player_present: probe.local_player_present,
            game_data_present: probe.game_data_present,
            hud_visible: None,
            player_count: None,
            map: probe.map,
        }
    }

    pub fn with_ship_active(mut self, active: Option<bool>) -> Self {
        self.ship_active = active;
        self
    }

    pub fn with_matching_active(mut self, active: Option<bool>) -> Self {
        self.matching_active = active;
        self
    }

    pub fn with_hud_visible(mut self, visible: Option<bool>) -> Self {
        self.hud_visible = visible;
        self
    }

    pub fn with_player_count(mut self, count: Option<usize>) -> Self {
        self.player_count = count;
        self
    }

    pub fn with_map(mut self, map: Option<MapId>) -> Self {
        self.map = map;
        self
    }
}

/// A piece of evidence that can decide the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    ShipActive,
    MatchingActive,
}

impl Evidence {
    /// Whether the signals affirm this evidence. `None` counts as no.
    pub fn is_affirmed(self, signals: &SessionSignals) -> bool {
        let signal = match self {
            Evidence::ShipActive => signals.ship_active,
            Evidence::MatchingActive => signals.matching_active,
        };
        signal == Some(true)
    }
}

/// Evidence in the order it is checked, with the state each one selects.
pub const PRECEDENCE: [(Evidence, SessionState); 2] = [
    (Evidence::ShipActive, SessionState::Ship),
    (Evidence::MatchingActive, SessionState::Matching),
];

/// State used when no evidence is affirmed.
pub const FALLBACK_STATE: SessionState = SessionState::Lobby;

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub state: SessionState,
    /// The evidence that decided the state; `None` for the fallback.
    pub decided_by: Option<Evidence>,
    /// Map label while on a ship with a resolvable map, else the state name.
    pub label: String,
    pub signals: SessionSignals,
}

/// Reduces [`SessionSignals`] to a [`SessionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionClassifier;

impl SessionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `signals`. Never fails; partial or contradictory signals
    /// still produce a state.
    pub fn classify(&self, signals: SessionSignals) -> SessionReport {
        let decided = PRECEDENCE
            .iter()
            .copied()
            .find(|(evidence, _)| evidence.is_affirmed(&signals));

        let state = decided.map_or(FALLBACK_STATE, |(_, state)| state);
        let label = match (state, signals.map) {
            (SessionState::Ship, Some(map)) => map.label().to_string(),
            _ => state.as_str().to_string(),
        };

        SessionReport {
            state,
            decided_by: decided.map(|(evidence, _)| evidence),
            label,
            signals,
        }
    }
}
