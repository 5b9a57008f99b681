//! Configuration system for shipview.
//!
//! Provides TOML-based configuration with:
//! - Per-category cache TTLs (`[cache.ttl]`)
//! - Pointer map TTL for the fast coordinate path (`[pointer_map]`)
//! - HUD scan pacing and time budget (`[hud]`)
//! - Logging level and optional log directory (`[logging]`)
//! - Config file layering (user config dir + project-local overrides)
//!
//! All values are seconds; every option has a default, so an empty file is
//! a valid config.

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options, save_config,
    user_config_dir, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
