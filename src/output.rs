//! CLI output formatting for the build, check, and resolve commands.
//!
//! Each command has a `format_*` function (returns `Vec<String>` or
//! `String`) for testability and a `print_*` wrapper that writes to stdout.
//! Format functions are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Assets
//!     /app.js → /app-1700000000.min.js (minified)
//!     /site.css → /site-1699990000.min.css (reused)
//! Symbolic
//!     /vendor/jquery.js → https://cdn.example.com/jquery.min.js
//! Stale outputs removed
//!     assets/app-1699990000.min.js
//! Summary: 1 minified, 1 reused, 1 aliased, 1 stale deleted
//! ```
//!
//! ## Check
//!
//! ```text
//! Would minify
//!     /app.js (script)
//! Aliased
//!     /vendor/jquery.js → https://cdn.example.com/jquery.min.js
//! 2 ignored (unrecognized or already processed)
//! ```

use crate::build::{BuildReport, Disposition};
use crate::minify::AssetKind;
use crate::resolve::Resolution;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.assets.is_empty() {
        lines.push("Assets".to_string());
        for asset in &report.assets {
            let status = if asset.fresh { "minified" } else { "reused" };
            lines.push(format!(
                "{}{} → {} ({})",
                indent(1),
                asset.source_key,
                asset.output_key,
                status
            ));
        }
    }

    if !report.aliases.is_empty() {
        lines.push("Symbolic".to_string());
        for (source, target) in &report.aliases {
            lines.push(format!("{}{source} → {target}", indent(1)));
        }
    }

    if !report.deleted.is_empty() {
        lines.push("Stale outputs removed".to_string());
        for path in &report.deleted {
            lines.push(format!("{}{}", indent(1), path.display()));
        }
    }

    if !report.failures.is_empty() {
        lines.push("Skipped (unreadable)".to_string());
        for failure in &report.failures {
            lines.push(format!("{}{failure}", indent(1)));
        }
    }

    lines.push(format!("Summary: {report}"));
    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// Check (dry run)
// ============================================================================

pub fn format_check(entries: &[(String, Disposition)]) -> Vec<String> {
    let mut lines = Vec::new();

    let raw: Vec<_> = entries
        .iter()
        .filter_map(|(key, d)| match d {
            Disposition::Raw(kind) => Some((key, kind)),
            _ => None,
        })
        .collect();
    if !raw.is_empty() {
        lines.push("Would minify".to_string());
        for (key, kind) in raw {
            let label = match kind {
                AssetKind::Script => "script",
                AssetKind::Stylesheet => "stylesheet",
            };
            lines.push(format!("{}{key} ({label})", indent(1)));
        }
    }

    let aliased: Vec<_> = entries
        .iter()
        .filter_map(|(key, d)| match d {
            Disposition::Aliased(target) => Some((key, target)),
            _ => None,
        })
        .collect();
    if !aliased.is_empty() {
        lines.push("Aliased".to_string());
        for (key, target) in aliased {
            lines.push(format!("{}{key} → {target}", indent(1)));
        }
    }

    let ignored = entries
        .iter()
        .filter(|(_, d)| matches!(d, Disposition::Ignored))
        .count();
    if ignored > 0 {
        lines.push(format!(
            "{ignored} ignored (unrecognized or already processed)"
        ));
    }

    lines
}

pub fn print_check(entries: &[(String, Disposition)]) {
    for line in format_check(entries) {
        println!("{line}");
    }
}

// ============================================================================
// Resolve
// ============================================================================

pub fn format_resolution(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Alias(url) => format!("alias         {url}"),
        Resolution::Fingerprinted(url) => format!("fingerprinted {url}"),
        Resolution::Fallback(url) => format!("fallback      {url}"),
    }
}

pub fn print_resolution(resolution: &Resolution) {
    println!("{}", format_resolution(resolution));
}
