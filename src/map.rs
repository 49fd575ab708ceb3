//! The persisted asset map.
//!
//! One JSON file holds everything the runtime resolver needs:
//!
//! ```json
//! {
//!   "timestamp": "1700000000",
//!   "static_map":    { "/app.js": "/app-1699999000.min.js" },
//!   "symbolic_map":  { "/vendor/jquery.js": "https://cdn.example.com/jquery.min.js" },
//!   "integrity_map": { "/app.js": "sha512-…" }
//! }
//! ```
//!
//! The builder overwrites the file wholesale on every run; the resolver loads
//! it once and treats it as immutable for the process lifetime.
//!
//! ## Loading modes
//!
//! - [`AssetMap::load`] is strict: a missing or corrupt map is an error. The
//!   resolver's host process should fail at startup rather than serve
//!   unfingerprinted URLs silently.
//! - [`AssetMap::load_or_empty`] is lenient: the builder uses it to read the
//!   *previous* map for stale-output cleanup, and a first build (or a corrupt
//!   leftover) simply means there is nothing to clean up.
//!
//! Maps written by older builds may lack `symbolic_map` or `integrity_map`
//! entirely; those fields default to empty on load.
//!
//! ## Atomicity
//!
//! [`AssetMap::save`] writes to a temp file in the target directory and
//! renames it into place. A crash mid-write leaves the previous map intact —
//! the resolver has no schema for a partial file, so a torn write must be
//! impossible.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not move map file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Snapshot of all fingerprint records, symbolic aliases, and the fallback
/// build timestamp.
///
/// `BTreeMap` keeps the serialized form sorted, so two builds over an
/// unchanged tree write byte-identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMap {
    /// Build time in integer epoch seconds, as a string. Appended as a query
    /// parameter to URLs the builder never saw (images, CDN references).
    #[serde(default)]
    pub timestamp: String,
    /// Original asset key → fingerprinted `.min` key.
    #[serde(default)]
    pub static_map: BTreeMap<String, String>,
    /// Original asset key → configured override URL. Consulted before the
    /// static map; never generated, only configured.
    #[serde(default)]
    pub symbolic_map: BTreeMap<String, String>,
    /// Original asset key → `sha512-<base64>` digest of the minified bytes.
    #[serde(default)]
    pub integrity_map: BTreeMap<String, String>,
}

impl AssetMap {
    /// Empty map stamped with the current time.
    pub fn new() -> Self {
        Self {
            timestamp: epoch_now(),
            ..Self::default()
        }
    }

    /// Strict load for the resolver. Missing file, unreadable file, and
    /// malformed JSON are all errors.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Lenient load for the builder's previous-map input. Any failure means
    /// "no previous build" — an empty map with no timestamp.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Atomically replace the map file: write to a temp file in the same
    /// directory, flush, then rename over the target.
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        let json = serde_json::to_string_pretty(self)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }
}

/// Current time as integer epoch seconds, stringified.
pub fn epoch_now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
