//! Minifier capability trait and the default pure-Rust implementation.
//!
//! The [`Minifier`] trait is the seam between the map builder and whatever
//! actually shrinks the source text. The production implementation is
//! [`NativeMinifier`] — oxc for JavaScript, lightningcss for CSS, both
//! statically linked into the binary with no external tools to install.
//!
//! The builder takes `&impl Minifier`, so tests can substitute a stub that
//! returns canned output (or fails on demand) without pulling real parsers
//! into every assertion.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier as OxcMinifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinifyError {
    #[error("JavaScript parse failed: {0}")]
    Script(String),
    #[error("CSS parse failed: {0}")]
    Stylesheet(String),
}

/// Kind of minifiable asset, recognized by file extension.
///
/// Only `js` and `css` files are fingerprint-mapped; everything else falls
/// back to the resolver's timestamp cache-buster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    /// Classify a path by its extension. Matching is exact and lowercase
    /// (`js`/`css`), mirroring how the map keys are generated.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" => Some(Self::Script),
            "css" => Some(Self::Stylesheet),
            _ => None,
        }
    }
}

/// Trait for minification backends.
///
/// Implementations must be pure and deterministic: identical input text must
/// produce identical output text, since the builder skips re-minification
/// whenever the fingerprinted output file already exists on disk.
pub trait Minifier {
    fn minify(&self, source: &str, kind: AssetKind) -> Result<String, MinifyError>;
}

/// Production minifier: oxc (parse → compress → mangle → codegen) for
/// JavaScript, lightningcss (parse → minified print) for CSS.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeMinifier;

impl Minifier for NativeMinifier {
    fn minify(&self, source: &str, kind: AssetKind) -> Result<String, MinifyError> {
        match kind {
            AssetKind::Script => minify_js(source),
            AssetKind::Stylesheet => minify_css(source),
        }
    }
}

fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        let detail = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(MinifyError::Script(detail));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

fn minify_css(source: &str) -> Result<String, MinifyError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| MinifyError::Stylesheet(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| MinifyError::Stylesheet(e.to_string()))?;
    Ok(result.code)
}
