//! Application configuration module.
//!
//! Handles loading and validating `dummybook.toml`. A missing file means stock
//! defaults; a present one is deserialized over them and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "DummyBook"          # Page title
//!
//! [feed]
//! # path = "feed.json"         # JSON feed; omit for the built-in seed
//!
//! [render]
//! output_dir = "dist"          # Where `render` writes index.html
//! collage_tiles = 3            # Collage tiles per image post (>= 1)
//! show_comment_input = true    # Comment box in the post viewer
//!
//! [logging]
//! level = "info"               # error|warn|info|debug|trace
//! format = "pretty"            # pretty|compact|json
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [render]
//! collage_tiles = 4
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Application configuration loaded from `dummybook.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Page title shown in the header and `<title>`.
    pub title: String,
    pub feed: FeedConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "DummyBook".to_string(),
            feed: FeedConfig::default(),
            render: RenderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be blank".into()));
        }
        if self.render.collage_tiles == 0 {
            return Err(ConfigError::Validation(
                "render.collage_tiles must be at least 1".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}, got {:?}",
                LOG_LEVELS.join("|"),
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Where posts come from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// JSON array of posts. When absent, the built-in seed feed is used.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    /// Maximum collage tiles per image post; the last one carries a `+N`
    /// overflow badge when there are more images.
    pub collage_tiles: usize,
    pub show_comment_input: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            collage_tiles: 3,
            show_comment_input: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        })
    }
}

/// Parse and validate the contents of a config file.
///
/// Every section is `#[serde(default)]`, so a sparse file only overrides the
/// keys it names.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is missing.
///
/// A relative `feed.path` is resolved against the config file's directory.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let mut config = parse_config(&fs::read_to_string(path)?)?;
    if let (Some(feed), Some(dir)) = (config.feed.path.as_mut(), path.parent()) {
        if feed.is_relative() {
            *feed = dir.join(&*feed);
        }
    }
    Ok(config)
}

/// Returns a fully-commented stock `dummybook.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# DummyBook Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Page title shown in the header and the browser tab.
title = "DummyBook"

# ---------------------------------------------------------------------------
# Feed source
# ---------------------------------------------------------------------------
[feed]
# JSON array of posts, relative to this file.
# When omitted, the built-in seed feed is used.
# path = "feed.json"

# ---------------------------------------------------------------------------
# HTML rendering
# ---------------------------------------------------------------------------
[render]
# Directory `dummybook render` writes index.html into.
output_dir = "dist"

# Collage tiles shown per image post. Extra images are summarized
# as "+N" on the last tile. Must be at least 1.
collage_tiles = 3

# Show the comment box under the post in the post viewer.
show_comment_input = true

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# One of: error, warn, info, debug, trace. RUST_LOG overrides this.
level = "info"

# One of: pretty, compact, json.
format = "pretty"
"##
}
