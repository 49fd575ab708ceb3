//! Watch-root scanning and URL key derivation.
//!
//! Stage 1 of the build: walk each configured [`WatchRoot`] and turn every
//! file into a [`FoundFile`] carrying its URL-shaped key. Classification
//! (symbolic alias? raw asset? already processed?) happens in the build
//! stage; the scanner only discovers files and names them.
//!
//! ## Pruned directories
//!
//! Subtrees named `src`, `plugins`, or `.git` are pre-minification source
//! trees and must never be scanned — neither for assets nor for outputs.
//! Pruning happens at traversal time via `filter_entry`, so an excluded
//! directory is never descended into and the exclusion is automatically
//! sticky for every descendant.
//!
//! ## Key shape
//!
//! A file's key is `prefix + "/" + path relative to the root's rel
//! directory`, with OS separators normalized to `/`:
//!
//! ```text
//! watch root { path: "assets", rel: "assets", prefix: "" }
//!   assets/app.js            → /app.js
//!   assets/lib/ui.css        → /lib/ui.css
//!
//! watch root { path: "themes/default/css", rel: "themes/default", prefix: "/theme" }
//!   themes/default/css/a.css → /theme/css/a.css
//! ```

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config::WatchRoot;

/// Directory names that are never scanned. Matched by name only, and the
/// exclusion covers all descendants.
pub const PRUNED_DIRS: &[&str] = &["src", "plugins", ".git"];

/// A source file vanished or became unreadable mid-scan. Non-fatal: the
/// build skips the file and reports the failure.
#[derive(Error, Debug)]
#[error("unreadable asset {path}: {reason}")]
pub struct AssetReadError {
    pub path: PathBuf,
    pub reason: String,
}

/// A file discovered under a watch root, with its derived URL key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    pub path: PathBuf,
    pub key: String,
}

/// Everything one watch root produced: files in deterministic name order,
/// plus any entries the walker could not read.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<FoundFile>,
    pub failures: Vec<AssetReadError>,
}

/// Walk one watch root and derive a key for every non-pruned file.
pub fn scan_root(base_dir: &Path, root: &WatchRoot) -> ScanOutcome {
    let walk_root = resolve(base_dir, &root.path);
    let rel_base = resolve(base_dir, &root.rel);

    let mut outcome = ScanOutcome::default();
    if !walk_root.exists() {
        outcome.failures.push(AssetReadError {
            path: walk_root,
            reason: "watch root does not exist".into(),
        });
        return outcome;
    }

    let walker = WalkDir::new(&walk_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_pruned_name(e.file_name())));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                outcome.failures.push(AssetReadError {
                    path: e.path().map(Path::to_path_buf).unwrap_or_default(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let key = relative_key(&path, &rel_base, &root.prefix);
        outcome.files.push(FoundFile { path, key });
    }

    outcome
}

/// Resolve a configured path against the invocation directory, leaving
/// absolute paths untouched.
pub fn resolve(base_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base_dir.join(configured)
    }
}

/// Derive the URL key for a file: prefix + "/" + slash-normalized path
/// relative to `rel_base`.
pub fn relative_key(path: &Path, rel_base: &Path, prefix: &str) -> String {
    let rel = relative_to(path, rel_base);
    let slashed = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{prefix}/{slashed}")
}

/// Map a URL key back to the filesystem path it was derived from. Inverse of
/// [`relative_key`] for keys generated by the same root; returns `None` when
/// the key does not carry this root's prefix.
pub fn key_to_path(base_dir: &Path, root: &WatchRoot, key: &str) -> Option<PathBuf> {
    let rest = key.strip_prefix(root.prefix.as_str())?;
    let rest = rest.strip_prefix('/')?;
    let mut path = resolve(base_dir, &root.rel);
    for segment in rest.split('/') {
        path.push(segment);
    }
    Some(path)
}

/// Compute `path` relative to `base`, inserting `..` components when `path`
/// is not under `base`. Both inputs should already be resolved against the
/// same invocation directory.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_comps: Vec<Component> = path.components().collect();
    let base_comps: Vec<Component> = base.components().collect();

    let common = path_comps
        .iter()
        .zip(base_comps.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_comps.len() {
        rel.push("..");
    }
    for comp in &path_comps[common..] {
        rel.push(comp.as_os_str());
    }
    rel
}

/// Heuristic for "this file was already minified, or came minified from a
/// third party": any ASCII digit in the stem, or a `.min`/`-min` substring.
///
/// Known limitation, preserved for compatibility with existing maps: a
/// legitimately versioned source file such as `vue2.js` is also excluded.
pub fn looks_processed(stem: &str) -> bool {
    stem.chars().any(|c| c.is_ascii_digit()) || stem.contains(".min") || stem.contains("-min")
}

fn is_pruned_name(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| PRUNED_DIRS.contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn root(path: &str, rel: &str, prefix: &str) -> WatchRoot {
        WatchRoot {
            path: PathBuf::from(path),
            rel: PathBuf::from(rel),
            prefix: prefix.to_string(),
        }
    }

    // =========================================================================
    // Key derivation
    // =========================================================================

    #[test]
    fn keys_are_relative_to_rel_base() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("lib")).unwrap();
        fs::write(assets.join("app.js"), "x").unwrap();
        fs::write(assets.join("lib/ui.css"), "x").unwrap();

        let outcome = scan_root(tmp.path(), &root("assets", "assets", ""));
        let keys: Vec<&str> = outcome.files.iter().map(|f| f.key.as_str()).collect();

        assert_eq!(keys, vec!["/app.js", "/lib/ui.css"]);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn prefix_is_prepended() {
        let tmp = TempDir::new().unwrap();
        let css = tmp.path().join("themes/default/css");
        fs::create_dir_all(&css).unwrap();
        fs::write(css.join("a.css"), "x").unwrap();

        let outcome = scan_root(
            tmp.path(),
            &root("themes/default/css", "themes/default", "/theme"),
        );
        assert_eq!(outcome.files[0].key, "/theme/css/a.css");
    }

    #[test]
    fn empty_rel_is_the_invocation_dir() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("app.js"), "x").unwrap();

        let outcome = scan_root(tmp.path(), &root("assets", "", ""));
        assert_eq!(outcome.files[0].key, "/assets/app.js");
    }

    #[test]
    fn key_to_path_inverts_relative_key() {
        let tmp = TempDir::new().unwrap();
        let r = root("themes/default/css", "themes/default", "/theme");

        let path = key_to_path(tmp.path(), &r, "/theme/css/a-100.min.css").unwrap();
        assert_eq!(path, tmp.path().join("themes/default/css/a-100.min.css"));

        assert!(key_to_path(tmp.path(), &r, "/other/css/a.css").is_none());
    }

    #[test]
    fn relative_to_walks_up_when_needed() {
        let rel = relative_to(Path::new("/a/b/file.js"), Path::new("/a/c"));
        assert_eq!(rel, PathBuf::from("../b/file.js"));
    }

    // =========================================================================
    // Pruning
    // =========================================================================

    #[test]
    fn pruned_directories_are_never_scanned() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("src")).unwrap();
        fs::create_dir_all(assets.join("plugins/vendor")).unwrap();
        fs::create_dir_all(assets.join(".git/objects")).unwrap();
        fs::write(assets.join("app.js"), "x").unwrap();
        fs::write(assets.join("src/raw.js"), "x").unwrap();
        fs::write(assets.join("plugins/vendor/p.js"), "x").unwrap();
        fs::write(assets.join(".git/objects/o.js"), "x").unwrap();

        let outcome = scan_root(tmp.path(), &root("assets", "assets", ""));
        let keys: Vec<&str> = outcome.files.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["/app.js"]);
    }

    #[test]
    fn pruning_is_sticky_for_descendants() {
        let tmp = TempDir::new().unwrap();
        // `js` under `src` would not itself match the exclusion list, but the
        // excluded ancestor keeps the whole subtree out.
        let nested = tmp.path().join("assets/src/js/widgets");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("widget.js"), "x").unwrap();

        let outcome = scan_root(tmp.path(), &root("assets", "assets", ""));
        assert!(outcome.files.is_empty());
    }

    #[test]
    fn missing_watch_root_is_a_reported_failure() {
        let tmp = TempDir::new().unwrap();
        let outcome = scan_root(tmp.path(), &root("nonexistent", "", ""));
        assert!(outcome.files.is_empty());
        assert_eq!(outcome.failures.len(), 1);
    }

    // =========================================================================
    // Already-processed heuristic
    // =========================================================================

    #[test]
    fn processed_names_are_detected() {
        assert!(looks_processed("app-1700000000.min"));
        assert!(looks_processed("jquery.min"));
        assert!(looks_processed("bundle-min"));
        assert!(looks_processed("v2-widget"));
    }

    #[test]
    fn raw_names_pass() {
        assert!(!looks_processed("app"));
        assert!(!looks_processed("main-styles"));
        assert!(!looks_processed("admin.panel"));
    }

    #[test]
    fn versioned_source_false_positive_is_preserved() {
        // Documented compatibility limitation: a digit anywhere in the stem
        // marks the file as processed, even for genuine sources like vue2.js.
        assert!(looks_processed("vue2"));
    }
}
