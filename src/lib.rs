//! # asset-map
//!
//! Deploy-time static asset fingerprinting for web apps. The builder walks
//! your asset directories, minifies every `.js`/`.css` file into a
//! content-addressed sibling (`app.js` → `app-1700000000.min.js`), and
//! persists a JSON map. The resolver loads that map at server startup and
//! turns original URLs into fingerprinted ones at render time.
//!
//! # Architecture: Build Once, Resolve Forever
//!
//! The crate splits cleanly into a deploy half and a request half, joined
//! only by the persisted map file:
//!
//! ```text
//! 1. Build     assets.toml  →  *.min files + static-map.json   (one run per deploy)
//! 2. Resolve   static-map.json  →  URLs / integrity / tags     (per request)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Zero request-time work**: the server never minifies or hashes; it
//!   does two map lookups per URL.
//! - **Inspectability**: the map is human-readable JSON you can diff between
//!   deploys.
//! - **Testability**: the resolver is a pure function of a loaded map, so
//!   rendering code can be tested with a hand-built map and no filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `assets.toml` loading and validation: watch roots, symbolic aliases, map location |
//! | [`scan`] | Walks watch roots, prunes source trees, derives URL-shaped keys |
//! | [`minify`] | The [`Minifier`](minify::Minifier) trait and the oxc/lightningcss implementation |
//! | [`build`] | The deploy-time pass: classify, minify, fingerprint, clean stale outputs, persist the map |
//! | [`map`] | The persisted [`AssetMap`](map::AssetMap): static, symbolic, and integrity maps plus the build timestamp |
//! | [`resolve`] | Request-time [`AssetResolver`](resolve::AssetResolver): symbolic → static → timestamp fallback, dev-mode identity |
//! | [`tags`] | `<script>` and `<link>` tag builders over the resolver |
//! | [`output`] | CLI output formatting for the build, check, and resolve commands |
//!
//! # Design Decisions
//!
//! ## Modification Time as the Fingerprint
//!
//! The output name embeds the source's mtime in epoch seconds, not a content
//! hash. An unchanged file keeps its name across builds, so the existing
//! output is reused without re-minifying; a touched file gets a new name and
//! the old output is garbage-collected. Content hashing would dedupe
//! no-op touches, but mtime keeps the rebuild check to a single `stat` and
//! matches how deploy tooling already reasons about changed files.
//!
//! ## Wholesale Map Replacement
//!
//! Each build writes a complete new map from what it actually saw — entries
//! are never merged with the previous map, so deleted sources disappear from
//! the map instead of lingering. The write is atomic (temp file + rename);
//! a crashed build leaves the previous map intact.
//!
//! ## Tagged Resolution
//!
//! The resolver returns [`Resolution`](resolve::Resolution) — alias,
//! fingerprinted, or fallback — rather than a bare string, so callers and
//! tests can assert *which* branch fired. `resolve_url` flattens it for the
//! common case.

pub mod build;
pub mod config;
pub mod map;
pub mod minify;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod tags;

#[cfg(test)]
pub(crate) mod test_helpers;
