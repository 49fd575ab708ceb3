//! Build configuration module.
//!
//! Handles loading and validating `assets.toml`, which names the watch roots
//! to scan for minifiable assets and the symbolic aliases that override
//! fingerprinting entirely.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Where the builder writes the asset map (and where the resolver reads it).
//! map_file = "static-map.json"
//!
//! # Directories to scan for .js/.css assets. `path` is resolved against the
//! # invocation directory unless absolute. `rel` is the directory URLs are
//! # computed relative to; `prefix` is prepended to every generated key.
//! [[watch]]
//! path = "assets"
//! rel = "assets"
//! prefix = ""
//!
//! [[watch]]
//! path = "themes/default/css"
//! rel = "themes/default"
//! prefix = "/theme"
//!
//! # Assets served from somewhere else entirely. The source key is never
//! # minified or fingerprinted; the resolver returns `link` verbatim.
//! [[symbolic]]
//! path = "/vendor/jquery.js"
//! link = "https://cdn.example.com/jquery-3.7.1.min.js"
//! ```
//!
//! ## Partial Configuration
//!
//! Everything except `[[watch]]` is optional. Unknown keys are rejected to
//! catch typos early.

use serde::{Deserialize, Serialize};
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

/// A directory scanned for minifiable assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchRoot {
    /// Directory to walk. Resolved against the invocation directory when
    /// relative.
    pub path: PathBuf,
    /// Directory asset URLs are computed relative to. Defaults to the
    /// invocation directory itself.
    #[serde(default)]
    pub rel: PathBuf,
    /// Prepended to every generated key, e.g. `/theme`. Defaults to empty,
    /// which yields keys like `/app.js`.
    #[serde(default)]
    pub prefix: String,
}

/// A configured override: this source key resolves to `link`, bypassing
/// minification and fingerprinting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolicAlias {
    /// Source key, in the same URL shape the scanner generates.
    pub path: String,
    /// Target URL returned by the resolver.
    pub link: String,
}

/// Build configuration loaded from `assets.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Location of the persisted asset map.
    pub map_file: PathBuf,
    /// Directories scanned for assets, processed in order.
    pub watch: Vec<WatchRoot>,
    /// Configured alias overrides, consulted before minification.
    pub symbolic: Vec<SymbolicAlias>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            map_file: PathBuf::from("static-map.json"),
            watch: Vec::new(),
            symbolic: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[watch]] entry is required".into(),
            ));
        }
        for root in &self.watch {
            if root.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "watch.path must not be empty".into(),
                ));
            }
            if root.prefix.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "watch.prefix '{}' must not end with '/'",
                    root.prefix
                )));
            }
        }
        let mut seen = std::collections::BTreeSet::new();
        for alias in &self.symbolic {
            if !seen.insert(alias.path.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate symbolic path '{}'",
                    alias.path
                )));
            }
        }
        Ok(())
    }
}

/// A stock `assets.toml` with all options documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    r#"# asset-map configuration
# All options shown; only [[watch]] entries are required.

# Where the builder writes the asset map (and where the resolver reads it).
map_file = "static-map.json"

# Directories to scan for .js/.css assets. `path` is resolved against the
# invocation directory unless absolute. `rel` is the directory URLs are
# computed relative to; `prefix` is prepended to every generated key.
[[watch]]
path = "assets"
rel = "assets"
prefix = ""

# Assets served from somewhere else entirely. The source key is never
# minified or fingerprinted; the resolver returns `link` verbatim.
# [[symbolic]]
# path = "/vendor/jquery.js"
# link = "https://cdn.example.com/jquery-3.7.1.min.js"
"#
    .to_string()
}
