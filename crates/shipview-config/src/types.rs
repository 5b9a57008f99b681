//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [cache.ttl]          # per-category TTL in seconds
//! players = 0.15
//! tasks = 3.0
//!
//! [pointer_map]        # fast coordinate path
//! ttl = 1.0
//!
//! [hud]                # bounded HUD scan
//! min_interval = 1.5
//! time_budget = 0.1
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/shipview"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shipview_types::Category;

use crate::error::{ConfigError, Result};

/// Default values for every numeric option, in seconds.
pub mod defaults {
    use shipview_types::Category;

    pub const PLAYERS_TTL: f64 = 0.15;
    pub const COLORS_TTL: f64 = 1.0;
    pub const TASKS_TTL: f64 = 3.0;
    pub const HUD_TTL: f64 = 1.5;
    pub const SESSION_TTL: f64 = 0.5;

    pub const POINTER_MAP_TTL: f64 = 1.0;
    pub const HUD_MIN_INTERVAL: f64 = 1.5;
    pub const HUD_TIME_BUDGET: f64 = 0.10;

    /// Floors and ceilings applied after validation.
    pub const POINTER_MAP_TTL_FLOOR: f64 = 0.1;
    pub const HUD_MIN_INTERVAL_FLOOR: f64 = 0.05;
    pub const HUD_TIME_BUDGET_FLOOR: f64 = 0.05;
    pub const HUD_TIME_BUDGET_CEILING: f64 = 10.0;

    pub const LOG_LEVEL: &str = "info";

    pub fn category_ttl(category: Category) -> f64 {
        match category {
            Category::Players => PLAYERS_TTL,
            Category::Colors => COLORS_TTL,
            Category::Tasks => TASKS_TTL,
            Category::Hud => HUD_TTL,
            Category::Session => SESSION_TTL,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g. project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub cache: Option<CacheSection>,
    pub pointer_map: Option<PointerMapSection>,
    pub hud: Option<HudSection>,
    pub logging: Option<LoggingConfig>,
}

impl ViewConfig {
    /// Create an empty config (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_str)?;
        if let Some(cache) = config.cache.as_mut() {
            cache.canonicalize();
        }
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: ViewConfig) {
        if let Some(mut cache) = other.cache {
            cache.canonicalize();
            let ours = self.cache.get_or_insert_with(CacheSection::default);
            ours.canonicalize();
            ours.ttl.extend(cache.ttl);
        }

        if let Some(pointer_map) = other.pointer_map {
            let ours = self.pointer_map.get_or_insert_with(PointerMapSection::default);
            if pointer_map.ttl.is_some() {
                ours.ttl = pointer_map.ttl;
            }
        }

        if let Some(hud) = other.hud {
            let ours = self.hud.get_or_insert_with(HudSection::default);
            if hud.min_interval.is_some() {
                ours.min_interval = hud.min_interval;
            }
            if hud.time_budget.is_some() {
                ours.time_budget = hud.time_budget;
            }
        }

        if let Some(logging) = other.logging {
            let ours = self.logging.get_or_insert_with(LoggingConfig::default);
            if logging.level.is_some() {
                ours.level = logging.level;
            }
            if logging.dir.is_some() {
                ours.dir = logging.dir;
            }
        }
    }

    /// Set a category TTL by name.
    ///
    /// Fails on names outside the category set and on negative or
    /// non-finite values.
    pub fn set_ttl(&mut self, category: &str, seconds: f64) -> Result<()> {
        let category: Category = category.parse()?;
        seconds_to_duration(category.as_str(), seconds)?;
        self.cache
            .get_or_insert_with(CacheSection::default)
            .ttl
            .insert(category.as_str().to_string(), seconds);
        Ok(())
    }

    /// TTL configured for `category`, or its default.
    pub fn category_ttl(&self, category: Category) -> Result<Duration> {
        let configured = self.cache.as_ref().and_then(|cache| {
            cache.ttl.get(category.as_str()).copied().or_else(|| {
                cache
                    .ttl
                    .iter()
                    .find(|(name, _)| name.parse::<Category>().ok() == Some(category))
                    .map(|(_, secs)| *secs)
            })
        });
        let seconds = configured.unwrap_or_else(|| defaults::category_ttl(category));
        seconds_to_duration(&format!("cache.ttl.{category}"), seconds)
    }

    /// Pointer map TTL, floored at [`defaults::POINTER_MAP_TTL_FLOOR`].
    pub fn pointer_map_ttl(&self) -> Result<Duration> {
        let seconds = self
            .pointer_map
            .as_ref()
            .and_then(|p| p.ttl)
            .unwrap_or(defaults::POINTER_MAP_TTL);
        seconds_to_duration("pointer_map.ttl", seconds)
            .map(|d| d.max(Duration::from_secs_f64(defaults::POINTER_MAP_TTL_FLOOR)))
    }

    /// Minimum spacing between HUD scans.
    pub fn hud_min_interval(&self) -> Result<Duration> {
        let seconds = self
            .hud
            .as_ref()
            .and_then(|h| h.min_interval)
            .unwrap_or(defaults::HUD_MIN_INTERVAL);
        seconds_to_duration("hud.min_interval", seconds)
            .map(|d| d.max(Duration::from_secs_f64(defaults::HUD_MIN_INTERVAL_FLOOR)))
    }

    /// Wall-clock budget for a single HUD scan.
    pub fn hud_time_budget(&self) -> Result<Duration> {
        let seconds = self
            .hud
            .as_ref()
            .and_then(|h| h.time_budget)
            .unwrap_or(defaults::HUD_TIME_BUDGET);
        seconds_to_duration("hud.time_budget", seconds).map(|d| {
            d.clamp(
                Duration::from_secs_f64(defaults::HUD_TIME_BUDGET_FLOOR),
                Duration::from_secs_f64(defaults::HUD_TIME_BUDGET_CEILING),
            )
        })
    }

    /// Check every option and resolve the effective timings.
    pub fn timings(&self) -> Result<Timings> {
        if let Some(cache) = &self.cache {
            for name in cache.ttl.keys() {
                name.parse::<Category>()?;
            }
        }

        let mut ttls = BTreeMap::new();
        for category in Category::ALL {
            ttls.insert(category, self.category_ttl(category)?);
        }

        Ok(Timings {
            ttls,
            pointer_map_ttl: self.pointer_map_ttl()?,
            hud_min_interval: self.hud_min_interval()?,
            hud_time_budget: self.hud_time_budget()?,
        })
    }

    /// Validate without keeping the resolved timings.
    pub fn validate(&self) -> Result<()> {
        self.timings().map(|_| ())
    }

    /// Logging settings, defaulted.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

/// Convert a seconds value from config into a `Duration`.
pub fn seconds_to_duration(field: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::InvalidDuration {
        field: field.to_string(),
        value: seconds,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// The `[cache]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// TTL in seconds keyed by category name. Zero disables caching.
    pub ttl: BTreeMap<String, f64>,
}

impl CacheSection {
    /// Rewrite recognised category names to their canonical spelling so
    /// that `Colors` and `colors` land on the same key. Unknown names are
    /// kept (trimmed) for validation to report.
    fn canonicalize(&mut self) {
        self.ttl = std::mem::take(&mut self.ttl)
            .into_iter()
            .map(|(name, secs)| {
                let key = match name.parse::<Category>() {
                    Ok(category) => category.as_str().to_string(),
                    Err(_) => name.trim().to_string(),
                };
                (key, secs)
            })
            .collect();
    }
}

/// The `[pointer_map]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerMapSection {
    pub ttl: Option<f64>,
}

/// The `[hud]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudSection {
    /// Minimum seconds between two scans.
    pub min_interval: Option<f64>,
    /// Maximum seconds a single scan may run.
    pub time_budget: Option<f64>,
}

/// The `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive for console output (`info`, `shipview=debug`, ...).
    pub level: Option<String>,
    /// Directory for daily-rotated JSON logs. No file logging when unset.
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(defaults::LOG_LEVEL)
    }
}

/// Validated durations for every cache and scan knob.
#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    pub ttls: BTreeMap<Category, Duration>,
    pub pointer_map_ttl: Duration,
    pub hud_min_interval: Duration,
    pub hud_time_budget: Duration,
}

impl Timings {
    pub fn ttl(&self, category: Category) -> Duration {
        self.ttls
            .get(&category)
            .copied()
            .unwrap_or_else(|| Duration::from_secs_f64(defaults::category_ttl(category)))
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            ttls: Category::ALL
                .into_iter()
                .map(|c| (c, Duration::from_secs_f64(defaults::category_ttl(c))))
                .collect(),
            pointer_map_ttl: Duration::from_secs_f64(defaults::POINTER_MAP_TTL),
            hud_min_interval: Duration::from_secs_f64(defaults::HUD_MIN_INTERVAL),
            hud_time_budget: Duration::from_secs_f64(defaults::HUD_TIME_BUDGET),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ViewConfig::from_toml("").unwrap();
        let timings = config.timings().unwrap();

        assert_eq!(timings, Timings::default());
        assert_eq!(timings.ttl(Category::Players), Duration::from_millis(150));
        assert_eq!(timings.ttl(Category::Tasks), Duration::from_secs(3));
        assert_eq!(timings.hud_time_budget, Duration::from_millis(100));
    }

    #[test]
    fn test_parse_full_config() {
        let config = ViewConfig::from_toml(
            r#"
[cache.ttl]
players = 0.0
Colors = 2.5

[pointer_map]
ttl = 0.5

[hud]
min_interval = 1.0
time_budget = 0.25

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let timings = config.timings().unwrap();
        assert_eq!(timings.ttl(Category::Players), Duration::ZERO);
        assert_eq!(timings.ttl(Category::Colors), Duration::from_millis(2500));
        assert_eq!(timings.ttl(Category::Hud), Duration::from_millis(1500));
        assert_eq!(timings.pointer_map_ttl, Duration::from_millis(500));
        assert_eq!(timings.hud_min_interval, Duration::from_secs(1));
        assert_eq!(timings.hud_time_budget, Duration::from_millis(250));
        assert_eq!(config.logging().level(), "debug");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let config = ViewConfig::from_toml("[cache.ttl]\npositions = 1.0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCategory(_)));
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let mut config = ViewConfig::new();
        let err = config.set_ttl("tasks", -1.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));

        let err = config.set_ttl("tasks", f64::NAN).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }

    #[test]
    fn test_set_ttl_by_name() {
        let mut config = ViewConfig::new();
        config.set_ttl(" HUD ", 4.0).unwrap();
        assert_eq!(
            config.category_ttl(Category::Hud).unwrap(),
            Duration::from_secs(4)
        );
        assert!(config.set_ttl("radar", 1.0).is_err());
    }

    #[test]
    fn test_floors_and_ceilings() {
        let config = ViewConfig::from_toml(
            r#"
[pointer_map]
ttl = 0.01

[hud]
min_interval = 0.0
time_budget = 60.0
"#,
        )
        .unwrap();

        assert_eq!(config.pointer_map_ttl().unwrap(), Duration::from_millis(100));
        assert_eq!(config.hud_min_interval().unwrap(), Duration::from_millis(50));
        assert_eq!(config.hud_time_budget().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_merge_overrides_per_field() {
        let mut base = ViewConfig::from_toml(
            r#"
[cache.ttl]
players = 0.2
tasks = 5.0

[hud]
min_interval = 2.0
time_budget = 0.2
"#,
        )
        .unwrap();
        let overlay = ViewConfig::from_toml(
            r#"
[cache.ttl]
players = 0.05

[hud]
time_budget = 0.3
"#,
        )
        .unwrap();

        base.merge(overlay);

        assert_eq!(
            base.category_ttl(Category::Players).unwrap(),
            Duration::from_millis(50)
        );
        assert_eq!(base.category_ttl(Category::Tasks).unwrap(), Duration::from_secs(5));
        assert_eq!(base.hud_min_interval().unwrap(), Duration::from_secs(2));
        assert_eq!(base.hud_time_budget().unwrap(), Duration::from_millis(300));
    }

    #[test]
    fn test_merge_later_layer_wins_regardless_of_case() {
        let mut base = ViewConfig::from_toml("[cache.ttl]\nColors = 4.0\n").unwrap();
        let overlay = ViewConfig::from_toml("[cache.ttl]\ncolors = 1.0\n").unwrap();

        base.merge(overlay);

        assert_eq!(base.category_ttl(Category::Colors).unwrap(), Duration::from_secs(1));
        let keys: Vec<_> = base.cache.as_ref().unwrap().ttl.keys().cloned().collect();
        assert_eq!(keys, vec!["colors".to_string()]);
    }

    #[test]
    fn test_merge_canonicalizes_hand_built_layers() {
        let mut base = ViewConfig {
            cache: Some(CacheSection {
                ttl: BTreeMap::from([(" TASKS ".to_string(), 9.0)]),
            }),
            ..ViewConfig::default()
        };
        let mut overlay = ViewConfig::new();
        overlay.set_ttl("tasks", 2.0).unwrap();

        base.merge(overlay);

        assert_eq!(base.category_ttl(Category::Tasks).unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_to_toml_preserves_values() {
        let mut config = ViewConfig::new();
        config.set_ttl("session", 0.75).unwrap();
        let text = config.to_toml().unwrap();
        let parsed = ViewConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
