//! Values stored per category.

use std::collections::BTreeMap;

use serde::Serialize;
use shipview_types::{
    Category, ColorId, HudStatus, PlayerId, PlayerRecord, SessionProbe, TaskRecord,
};

use crate::throttle::PartialScan;

/// The cached value of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", content = "value", rename_all = "snake_case")]
pub enum CategoryValue {
    Players(Vec<PlayerRecord>),
    Colors(BTreeMap<PlayerId, ColorId>),
    Tasks(BTreeMap<PlayerId, Vec<TaskRecord>>),
    Hud(PartialScan<HudStatus>),
    Session(SessionProbe),
}

impl CategoryValue {
    pub fn category(&self) -> Category {
        match self {
            CategoryValue::Players(_) => Category::Players,
            CategoryValue::Colors(_) => Category::Colors,
            CategoryValue::Tasks(_) => Category::Tasks,
            CategoryValue::Hud(_) => Category::Hud,
            CategoryValue::Session(_) => Category::Session,
        }
    }

    pub fn into_players(self) -> Option<Vec<PlayerRecord>> {
        match self {
            CategoryValue::Players(players) => Some(players),
            _ => None,
        }
    }

    pub fn into_colors(self) -> Option<BTreeMap<PlayerId, ColorId>> {
        match self {
            CategoryValue::Colors(colors) => Some(colors),
            _ => None,
        }
    }

    pub fn into_tasks(self) -> Option<BTreeMap<PlayerId, Vec<TaskRecord>>> {
        match self {
            CategoryValue::Tasks(tasks) => Some(tasks),
            _ => None,
        }
    }

    pub fn into_hud(self) -> Option<PartialScan<HudStatus>> {
        match self {
            CategoryValue::Hud(scan) => Some(scan),
            _ => None,
        }
    }

    pub fn into_session(self) -> Option<SessionProbe> {
        match self {
            CategoryValue::Session(probe) => Some(probe),
            _ => None,
        }
    }
}
