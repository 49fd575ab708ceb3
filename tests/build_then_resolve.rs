//! End-to-end: run a real build with the native minifiers, then resolve URLs
//! from the persisted map the way a server would.

use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use tempfile::TempDir;

use asset_map::build::build;
use asset_map::config::{BuildConfig, SymbolicAlias, WatchRoot};
use asset_map::minify::NativeMinifier;
use asset_map::resolve::{AssetResolver, Mode, Resolution};
use asset_map::tags::TagAttrs;

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn set_mtime(path: &Path, epoch: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(epoch))
        .unwrap();
}

fn site_config(base: &Path) -> BuildConfig {
    BuildConfig {
        map_file: base.join("static-map.json"),
        watch: vec![WatchRoot {
            path: "assets".into(),
            rel: "assets".into(),
            prefix: String::new(),
        }],
        symbolic: vec![SymbolicAlias {
            path: "/vendor/jquery.js".into(),
            link: "https://cdn.example.com/jquery-3.7.1.min.js".into(),
        }],
    }
}

fn populate(base: &Path) {
    write_file(
        &base.join("assets/app.js"),
        "function greet(name) { return \"hello, \" + name; }\nwindow.greet = greet;\n",
    );
    write_file(
        &base.join("assets/site.css"),
        "body { color: #ff0000; margin: 0px; }\n",
    );
    write_file(&base.join("assets/vendor/jquery.js"), "/* full jquery */\n");
    set_mtime(&base.join("assets/app.js"), 1_700_000_000);
    set_mtime(&base.join("assets/site.css"), 1_700_000_000);
}

#[test]
fn build_then_resolve_round_trip() {
    let tmp = TempDir::new().unwrap();
    populate(tmp.path());
    let config = site_config(tmp.path());

    let outcome = build(tmp.path(), &config, &NativeMinifier).unwrap();
    assert!(outcome.report.failures.is_empty());
    assert_eq!(outcome.report.minified(), 2);

    let resolver =
        AssetResolver::from_file(&tmp.path().join("static-map.json"), Mode::Production).unwrap();

    // Fingerprinted assets resolve to their minified outputs, which exist.
    assert_eq!(
        resolver.lookup("/app.js"),
        Resolution::Fingerprinted("/app-1700000000.min.js".into())
    );
    assert!(tmp.path().join("assets/app-1700000000.min.js").exists());
    assert_eq!(
        resolver.resolve_url("/site.css"),
        "/site-1700000000.min.css"
    );
    assert!(
        resolver
            .resolve_integrity("/app.js")
            .starts_with("sha512-")
    );

    // The symbolic alias bypassed minification entirely.
    assert_eq!(
        resolver.lookup("/vendor/jquery.js"),
        Resolution::Alias("https://cdn.example.com/jquery-3.7.1.min.js".into())
    );
    assert!(!tmp.path().join("assets/vendor/jquery-1700000000.min.js").exists());

    // Unknown assets get the build-timestamp cache buster.
    let fallback = resolver.resolve_url("/logo.png");
    assert!(fallback.starts_with("/logo.png?"), "got {fallback}");
}

#[test]
fn touched_source_changes_the_resolved_url() {
    let tmp = TempDir::new().unwrap();
    populate(tmp.path());
    let config = site_config(tmp.path());

    build(tmp.path(), &config, &NativeMinifier).unwrap();
    set_mtime(&tmp.path().join("assets/app.js"), 1_700_000_100);
    let outcome = build(tmp.path(), &config, &NativeMinifier).unwrap();

    // Only the touched file was re-minified; its old output is gone.
    assert_eq!(outcome.report.minified(), 1);
    assert_eq!(outcome.report.reused(), 1);
    assert_eq!(outcome.report.deleted.len(), 1);
    assert!(!tmp.path().join("assets/app-1700000000.min.js").exists());

    let resolver =
        AssetResolver::from_file(&tmp.path().join("static-map.json"), Mode::Production).unwrap();
    assert_eq!(resolver.resolve_url("/app.js"), "/app-1700000100.min.js");
    assert_eq!(
        resolver.resolve_url("/site.css"),
        "/site-1700000000.min.css"
    );
}

#[test]
fn development_mode_ignores_the_map() {
    let tmp = TempDir::new().unwrap();
    populate(tmp.path());
    let config = site_config(tmp.path());
    build(tmp.path(), &config, &NativeMinifier).unwrap();

    let resolver =
        AssetResolver::from_file(&tmp.path().join("static-map.json"), Mode::Development).unwrap();
    assert_eq!(resolver.resolve_url("/app.js"), "/app.js");
    assert_eq!(resolver.resolve_url("/vendor/jquery.js"), "/vendor/jquery.js");
    assert_eq!(resolver.resolve_integrity("/app.js"), "");
}

#[test]
fn tags_emit_fingerprinted_urls_with_integrity() {
    let tmp = TempDir::new().unwrap();
    populate(tmp.path());
    let config = site_config(tmp.path());
    build(tmp.path(), &config, &NativeMinifier).unwrap();

    let resolver =
        AssetResolver::from_file(&tmp.path().join("static-map.json"), Mode::Production).unwrap();

    let script = resolver.script_tag("/app.js", &TagAttrs::default());
    assert!(script.contains(r#"src="/app-1700000000.min.js""#), "got {script}");
    assert!(script.contains(r#"integrity="sha512-"#));

    let style = resolver.style_tag("/site.css", &TagAttrs::default());
    assert!(style.contains(r#"href="/site-1700000000.min.css""#), "got {style}");
    assert!(style.contains(r#"rel="stylesheet""#));
}
