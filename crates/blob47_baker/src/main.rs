//! Blob47 atlas baker
//!
//! Reads an atlas whose blob layout holds only the 5 Compact5 reference tiles
//! and writes it back with all 47 tiles generated.
//!
//! ```text
//! bake_blob47 blocks.png --tile-res 16 -o blocks.blob47.png
//! bake_blob47 blocks.png --config blocks.compact5.toml --preview preview.png
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod job;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use job::{parse_coord, BakeJob};

/// Generates Blob47 tile layouts from Compact5 reference tiles.
#[derive(Parser, Debug)]
#[command(name = "bake_blob47")]
#[command(about = "Generates Blob47 tile layouts from Compact5 reference tiles")]
struct Args {
    /// Atlas image holding the reference tiles.
    input: PathBuf,

    /// Compact5 settings file (TOML, or JSON by extension).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tile resolution, `16` or `16x8`. Overrides the settings file.
    #[arg(long, value_parser = parse_coord)]
    tile_res: Option<blob47_core::Coord>,

    /// Corner band thickness, `5` or `5x3`. Overrides the settings file.
    #[arg(long, value_parser = parse_coord)]
    margin: Option<blob47_core::Coord>,

    /// Top-left pixel of the blob layout, `192x0`. Overrides the settings file.
    #[arg(long, value_parser = parse_coord)]
    origin: Option<blob47_core::Coord>,

    /// Output image (default: `<input>.blob47.png` next to the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a connectivity preview of the layout.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Write the effective settings to this file.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let settings = job::resolve_settings(
        args.config.as_deref(),
        args.tile_res,
        args.margin,
        args.origin,
    )?;
    if let Some(path) = &args.save_config {
        settings.save(path)?;
        tracing::info!("Settings written to {}", path.display());
    }

    let output = args
        .output
        .unwrap_or_else(|| job::default_output_path(&args.input));

    BakeJob {
        input: args.input,
        output,
        preview: args.preview,
        settings,
    }
    .run()
}
