//! The closed set of cached data categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCategory;

/// One kind of cached data, each with its own TTL and cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Players,
    Colors,
    Tasks,
    Hud,
    Session,
}

impl Category {
    /// Every category, in refresh order.
    pub const ALL: [Category; 5] = [
        Category::Players,
        Category::Colors,
        Category::Tasks,
        Category::Hud,
        Category::Session,
    ];

    /// Stable lowercase name used in config files and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Players => "players",
            Category::Colors => "colors",
            Category::Tasks => "tasks",
            Category::Hud => "hud",
            Category::Session => "session",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
