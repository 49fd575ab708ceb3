//! Asset map building: minification, fingerprinting, stale-output cleanup.
//!
//! Stage 2 of the pipeline. Takes the scanner's file list per watch root and
//! decides, per file:
//!
//! 1. **Symbolic alias?** Record the configured target in the symbolic map
//!    and stop — aliases bypass minification entirely.
//! 2. **Raw asset?** Must be a recognized kind (`js`/`css`) and must not
//!    look already processed (digit in the stem, or `.min`/`-min`).
//! 3. **Fingerprint**: output name is `{stem}-{mtime_epoch}.min.{ext}` in the
//!    same directory. The mtime epoch is the cache key — an unchanged file
//!    keeps its output name, so the output already exists and nothing is
//!    re-minified. A touched file gets a new name, and the previous map
//!    tells us which old output to delete.
//! 4. **Integrity**: `sha512-<base64>` over the minified bytes. When the
//!    output already existed the bytes are re-read from disk — the builder
//!    never assumes in-memory content is available.
//!
//! After all roots are processed the new map replaces the old one atomically.
//!
//! ## Failure policy
//!
//! - A file that vanishes or turns unreadable mid-build is skipped and
//!   reported ([`AssetReadError`]); the build continues.
//! - A minifier failure aborts the whole build — a partial map cannot
//!   guarantee asset correctness.
//! - A failed stale-file delete only costs disk space; it is reported and
//!   the build continues.
//! - A failed map write is fatal; the atomic write leaves the prior map
//!   valid.
//!
//! The builder is single-threaded and run-to-completion: one invocation per
//! deploy, no locking. Concurrent builds over the same roots are not
//! supported — last map writer wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use base64::prelude::{BASE64_STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use thiserror::Error;

use crate::config::BuildConfig;
use crate::map::{AssetMap, MapError, epoch_now};
use crate::minify::{AssetKind, Minifier, MinifyError};
use crate::scan::{self, AssetReadError, FoundFile, looks_processed};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to minify {path}: {source}")]
    Minify {
        path: PathBuf,
        source: MinifyError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not persist asset map: {0}")]
    MapPersist(#[from] MapError),
}

/// One fingerprinted asset in the new map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltAsset {
    pub source_key: String,
    pub output_key: String,
    /// True when this run produced the output file; false when an up-to-date
    /// output from a previous build was reused.
    pub fresh: bool,
}

/// Summary of one build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub assets: Vec<BuiltAsset>,
    /// Symbolic aliases that matched a scanned file: (source key, target).
    pub aliases: Vec<(String, String)>,
    /// Stale outputs deleted from disk.
    pub deleted: Vec<PathBuf>,
    /// Files skipped because they could not be read.
    pub failures: Vec<AssetReadError>,
}

impl BuildReport {
    pub fn minified(&self) -> usize {
        self.assets.iter().filter(|a| a.fresh).count()
    }

    pub fn reused(&self) -> usize {
        self.assets.len() - self.minified()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minified, {} reused", self.minified(), self.reused())?;
        if !self.aliases.is_empty() {
            write!(f, ", {} aliased", self.aliases.len())?;
        }
        if !self.deleted.is_empty() {
            write!(f, ", {} stale deleted", self.deleted.len())?;
        }
        if !self.failures.is_empty() {
            write!(f, ", {} unreadable", self.failures.len())?;
        }
        Ok(())
    }
}

/// Result of a build: the persisted map plus the run summary.
#[derive(Debug)]
pub struct BuildOutcome {
    pub map: AssetMap,
    pub report: BuildReport,
}

/// How the builder will treat one scanned file. Shared between the real
/// build and the `check` dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Raw asset eligible for minification.
    Raw(AssetKind),
    /// Matches a configured symbolic alias; carries the target URL.
    Aliased(String),
    /// Unrecognized extension, or a name that already looks processed.
    Ignored,
}

/// Decide a scanned file's disposition. Symbolic aliases win over
/// everything; the already-processed heuristic keeps prior outputs (and
/// third-party `.min` bundles) out of the descriptor set.
pub fn classify(file: &FoundFile, aliases: &BTreeMap<&str, &str>) -> Disposition {
    if let Some(target) = aliases.get(file.key.as_str()) {
        return Disposition::Aliased((*target).to_string());
    }
    let Some(kind) = AssetKind::from_path(&file.path) else {
        return Disposition::Ignored;
    };
    match file.path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !looks_processed(stem) => Disposition::Raw(kind),
        _ => Disposition::Ignored,
    }
}

/// The symbolic alias lookup table used by [`classify`].
pub fn alias_table(config: &BuildConfig) -> BTreeMap<&str, &str> {
    config
        .symbolic
        .iter()
        .map(|a| (a.path.as_str(), a.link.as_str()))
        .collect()
}

/// Build the asset map for all configured watch roots and persist it to
/// `config.map_file` (resolved against `base_dir`), wholesale-replacing any
/// prior map.
///
/// Side effects: writes missing minified outputs next to their sources and
/// deletes outputs orphaned by modification-time changes.
pub fn build(
    base_dir: &Path,
    config: &BuildConfig,
    minifier: &impl Minifier,
) -> Result<BuildOutcome, BuildError> {
    let map_path = scan::resolve(base_dir, &config.map_file);
    let previous = AssetMap::load_or_empty(&map_path);
    let aliases = alias_table(config);

    let mut map = AssetMap::default();
    let mut report = BuildReport::default();

    for root in &config.watch {
        let rel_base = scan::resolve(base_dir, &root.rel);
        let mut outcome = scan::scan_root(base_dir, root);
        report.failures.append(&mut outcome.failures);

        for file in outcome.files {
            let kind = match classify(&file, &aliases) {
                // Symbolic aliases take priority and are mutually exclusive
                // with minification.
                Disposition::Aliased(target) => {
                    map.symbolic_map.insert(file.key.clone(), target.clone());
                    report.aliases.push((file.key, target));
                    continue;
                }
                Disposition::Ignored => continue,
                Disposition::Raw(kind) => kind,
            };
            // classify() only returns Raw for files with a valid UTF-8 stem.
            let Some(stem) = file.path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let epoch = match mtime_epoch(&file.path) {
                Ok(e) => e,
                Err(e) => {
                    report.failures.push(AssetReadError {
                        path: file.path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let ext = match kind {
                AssetKind::Script => "js",
                AssetKind::Stylesheet => "css",
            };
            let min_name = format!("{stem}-{epoch}.min.{ext}");
            let output_path = file.path.with_file_name(&min_name);
            let output_key = scan::relative_key(&output_path, &rel_base, &root.prefix);

            let mut minified: Option<String> = None;
            if !output_path.exists() {
                let source = match std::fs::read_to_string(&file.path) {
                    Ok(s) => s,
                    Err(e) => {
                        report.failures.push(AssetReadError {
                            path: file.path,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                let code = minifier
                    .minify(&source, kind)
                    .map_err(|source| BuildError::Minify {
                        path: file.path.clone(),
                        source,
                    })?;
                std::fs::write(&output_path, &code)?;
                minified = Some(code);
            }

            // Garbage-collect the output recorded by the previous build when
            // its name no longer matches. Never the file that is current.
            if let Some(old_key) = previous.static_map.get(&file.key)
                && old_key != &output_key
                && let Some(old_path) = scan::key_to_path(base_dir, root, old_key)
                && old_path != output_path
                && old_path.exists()
            {
                match std::fs::remove_file(&old_path) {
                    Ok(()) => report.deleted.push(old_path),
                    Err(e) => report.failures.push(AssetReadError {
                        path: old_path,
                        reason: format!("could not delete stale output: {e}"),
                    }),
                }
            }

            let digest = match &minified {
                Some(code) => Some(integrity_digest(code.as_bytes())),
                None => match std::fs::read(&output_path) {
                    Ok(bytes) => Some(integrity_digest(&bytes)),
                    Err(e) => {
                        report.failures.push(AssetReadError {
                            path: output_path.clone(),
                            reason: format!("could not hash existing output: {e}"),
                        });
                        None
                    }
                },
            };

            map.static_map.insert(file.key.clone(), output_key.clone());
            if let Some(digest) = digest {
                map.integrity_map.insert(file.key.clone(), digest);
            }
            report.assets.push(BuiltAsset {
                source_key: file.key,
                output_key,
                fresh: minified.is_some(),
            });
        }
    }

    map.timestamp = epoch_now();
    map.save(&map_path)?;

    Ok(BuildOutcome { map, report })
}

/// File modification time truncated to integer epoch seconds.
fn mtime_epoch(path: &Path) -> std::io::Result<u64> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs())
}

/// Subresource integrity digest: base64(SHA-512) with the scheme prefix.
fn integrity_digest(bytes: &[u8]) -> String {
    format!("sha512-{}", BASE64_STANDARD.encode(Sha512::digest(bytes)))
}
