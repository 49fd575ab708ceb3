//! Runtime asset URL resolution.
//!
//! The resolver is the request-time half of the pipeline: page-rendering
//! code hands it an original asset URL and gets back the URL to emit. It
//! owns an immutable [`AssetMap`] loaded once at construction — no globals,
//! no reloads — and is safe to share across request-handling threads.
//!
//! ## Lookup order (production)
//!
//! 1. **Symbolic map** — a configured override replaces the URL (one hop
//!    only, never recursive), then
//! 2. **Static map** — a fingerprinted `.min` URL, else
//! 3. **Fallback** — `url?{build timestamp}`, a cache-buster for assets the
//!    builder never saw (images, third-party references).
//!
//! The result is tagged ([`Resolution`]) so callers and tests can tell which
//! branch fired, not just the final string.
//!
//! ## Development mode
//!
//! In development every lookup is the identity function and integrity is
//! empty — the live source file is served directly, bypassing
//! fingerprinting entirely.

use std::path::Path;

use crate::map::{AssetMap, MapError};

/// Resolver mode. Externally supplied; [`Mode::from_env`] derives it from
/// the server environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Derive the mode from `SERVER_SOFTWARE`: a value starting with
    /// `Development` means a local dev server.
    pub fn from_env() -> Self {
        match std::env::var("SERVER_SOFTWARE") {
            Ok(v) if v.starts_with("Development") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Which branch of the lookup chain produced the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A configured symbolic alias matched; the target is returned verbatim.
    Alias(String),
    /// The static map matched; the fingerprinted URL is returned.
    Fingerprinted(String),
    /// Nothing matched; the timestamp-suffixed original is returned.
    Fallback(String),
}

impl Resolution {
    /// The final URL, whichever branch produced it.
    pub fn into_url(self) -> String {
        match self {
            Self::Alias(url) | Self::Fingerprinted(url) | Self::Fallback(url) => url,
        }
    }
}

/// Read-only, process-lifetime lookup over a loaded [`AssetMap`].
#[derive(Debug, Clone)]
pub struct AssetResolver {
    map: AssetMap,
    mode: Mode,
}

impl AssetResolver {
    pub fn new(map: AssetMap, mode: Mode) -> Self {
        Self { map, mode }
    }

    /// Load the map from disk and wrap it. A missing or corrupt map file is
    /// an error — the host process should fail at startup rather than serve
    /// unfingerprinted URLs silently.
    pub fn from_file(path: &Path, mode: Mode) -> Result<Self, MapError> {
        Ok(Self::new(AssetMap::load(path)?, mode))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The production lookup chain, independent of mode. Pure function of
    /// the loaded map.
    pub fn lookup(&self, url: &str) -> Resolution {
        let (url, via_alias) = match self.map.symbolic_map.get(url) {
            Some(target) => (target.as_str(), true),
            None => (url, false),
        };
        if let Some(fingerprinted) = self.map.static_map.get(url) {
            return Resolution::Fingerprinted(fingerprinted.clone());
        }
        if via_alias {
            return Resolution::Alias(url.to_string());
        }
        Resolution::Fallback(format!("{url}?{}", self.map.timestamp))
    }

    /// URL to emit for an original asset URL. Identity in development mode.
    pub fn resolve_url(&self, url: &str) -> String {
        if self.mode.is_development() {
            return url.to_string();
        }
        self.lookup(url).into_url()
    }

    /// Integrity digest for an original asset URL, or empty when unknown or
    /// in development mode.
    pub fn resolve_integrity(&self, url: &str) -> String {
        if self.mode.is_development() {
            return String::new();
        }
        self.map.integrity_map.get(url).cloned().unwrap_or_default()
    }
}
