//! Shared helpers for unit tests: filesystem fixtures, deterministic mtimes,
//! quick configs, and stub minifiers.
//!
//! Only compiled for tests; unwraps are fine here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use crate::config::{BuildConfig, SymbolicAlias, WatchRoot};
use crate::minify::{AssetKind, Minifier, MinifyError};

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Pin a file's modification time to an exact epoch second, so fingerprinted
/// output names are predictable.
pub fn set_mtime(path: &Path, epoch: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(epoch))
        .unwrap();
}

/// A config over `base` with the given `(path, rel, prefix)` watch roots and
/// `(path, link)` symbolic aliases. The map lands at `base/static-map.json`.
pub fn config_with(
    base: &Path,
    roots: &[(&str, &str, &str)],
    aliases: &[(&str, &str)],
) -> BuildConfig {
    BuildConfig {
        map_file: base.join("static-map.json"),
        watch: roots
            .iter()
            .map(|(path, rel, prefix)| WatchRoot {
                path: PathBuf::from(path),
                rel: PathBuf::from(rel),
                prefix: prefix.to_string(),
            })
            .collect(),
        symbolic: aliases
            .iter()
            .map(|(path, link)| SymbolicAlias {
                path: path.to_string(),
                link: link.to_string(),
            })
            .collect(),
    }
}

/// Deterministic fake minifier: wraps the trimmed source so tests can tell
/// output content apart from input without depending on real minifiers.
pub struct StubMinifier;

impl Minifier for StubMinifier {
    fn minify(&self, source: &str, _kind: AssetKind) -> Result<String, MinifyError> {
        Ok(format!("MIN[{}]", source.trim()))
    }
}

/// Minifier that always fails, for exercising the abort path.
pub struct FailingMinifier;

impl Minifier for FailingMinifier {
    fn minify(&self, _source: &str, kind: AssetKind) -> Result<String, MinifyError> {
        Err(match kind {
            AssetKind::Script => MinifyError::Script("stub failure".into()),
            AssetKind::Stylesheet => MinifyError::Stylesheet("stub failure".into()),
        })
    }
}
