use clap::{Parser, Subcommand};
use std::path::PathBuf;

use asset_map::minify::NativeMinifier;
use asset_map::resolve::{AssetResolver, Mode};
use asset_map::{build, config, output, scan};

#[derive(Parser)]
#[command(name = "asset-map")]
#[command(about = "Minify and fingerprint static web assets")]
#[command(long_about = "\
Minify and fingerprint static web assets

Walks the watch roots named in assets.toml, minifies every .js/.css file
into a sibling named {stem}-{mtime}.min.{ext}, and writes static-map.json
mapping original URLs to fingerprinted ones. Run once per deploy; serve
with the map loaded at startup.

  [[watch]]                        # a directory to scan
  path = \"assets\"                  # walked recursively (src/, plugins/,
  rel = \"assets\"                   #   and .git/ subtrees are skipped)
  prefix = \"\"                      # prepended to generated URL keys

  [[symbolic]]                     # serve this URL from elsewhere instead
  path = \"/vendor/jquery.js\"
  link = \"https://cdn.example.com/jquery-3.7.1.min.js\"

Run 'asset-map gen-config' to generate a documented assets.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "assets.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Minify changed assets and rewrite the asset map
    Build,
    /// Show how each scanned file would be treated, without writing anything
    Check,
    /// Look a URL up in the current map, the way a server would
    Resolve {
        /// Original asset URL, e.g. /app.js
        url: String,
        /// Resolve in development mode (returns the URL unchanged)
        #[arg(long)]
        dev: bool,
    },
    /// Print a stock assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::BuildConfig::load(&cli.config)?;
            let base_dir = std::env::current_dir()?;
            let outcome = build::build(&base_dir, &config, &NativeMinifier)?;
            output::print_build_report(&outcome.report);
        }
        Command::Check => {
            let config = config::BuildConfig::load(&cli.config)?;
            let base_dir = std::env::current_dir()?;
            let aliases = build::alias_table(&config);

            let mut entries = Vec::new();
            for root in &config.watch {
                let outcome = scan::scan_root(&base_dir, root);
                for failure in &outcome.failures {
                    eprintln!("warning: {failure}");
                }
                for file in outcome.files {
                    let disposition = build::classify(&file, &aliases);
                    entries.push((file.key, disposition));
                }
            }
            output::print_check(&entries);
        }
        Command::Resolve { url, dev } => {
            let config = config::BuildConfig::load(&cli.config)?;
            let base_dir = std::env::current_dir()?;
            let map_path = scan::resolve(&base_dir, &config.map_file);
            let mode = if dev { Mode::Development } else { Mode::from_env() };
            let resolver = AssetResolver::from_file(&map_path, mode)?;
            if resolver.mode().is_development() {
                println!("{}", resolver.resolve_url(&url));
            } else {
                output::print_resolution(&resolver.lookup(&url));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
