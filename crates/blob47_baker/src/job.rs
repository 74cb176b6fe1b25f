//! Settings resolution and the bake itself

use anyhow::{bail, Context, Result};
use blob47_autotile::{paint_layout_overlay, Compact5Settings, OverlayColors};
use blob47_core::Coord;
use image::Rgba;
use std::path::{Path, PathBuf};
use tracing::info;

const PREVIEW_COLORS: OverlayColors<Rgba<u8>> = OverlayColors {
    disconnected: Rgba([40, 40, 48, 255]),
    connected: Rgba([200, 200, 210, 255]),
    reference: Rgba([255, 0, 255, 255]),
};

/// Parse `16` as `16x16`, or `16x8` as is
pub fn parse_coord(s: &str) -> Result<Coord, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid value `{v}`: {e}"))
    };
    match s.split_once(['x', 'X', ',']) {
        Some((x, y)) => Ok(Coord::new(parse(x)?, parse(y)?)),
        None => Ok(Coord::splat(parse(s)?)),
    }
}

/// Merge the settings file (if any) with command-line overrides
pub fn resolve_settings(
    config: Option<&Path>,
    tile_res: Option<Coord>,
    margin: Option<Coord>,
    origin: Option<Coord>,
) -> Result<Compact5Settings> {
    let mut settings = match (config, tile_res) {
        (Some(path), _) => Compact5Settings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        (None, Some(tile_res)) => Compact5Settings::new(tile_res),
        (None, None) => bail!("either --config or --tile-res is required"),
    };

    if let Some(tile_res) = tile_res {
        settings.tile_res = tile_res;
    }
    if let Some(margin) = margin {
        settings.margin = Some(margin);
    }
    if let Some(origin) = origin {
        settings.layout_origin = origin;
    }

    settings.validate().context("Invalid tile geometry")?;
    Ok(settings)
}

/// `<dir>/<stem>.blob47.png`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "atlas".to_string());
    input.with_file_name(format!("{stem}.blob47.png"))
}

#[derive(Debug)]
pub struct BakeJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
    pub settings: Compact5Settings,
}

impl BakeJob {
    pub fn run(&self) -> Result<()> {
        let mut atlas = image::open(&self.input)
            .with_context(|| format!("Failed to open image: {}", self.input.display()))?
            .to_rgba8();
        info!(
            "Baking {} ({}x{}), tile {}, margin {}",
            self.input.display(),
            atlas.width(),
            atlas.height(),
            self.settings.tile_res,
            self.settings.margin()
        );

        self.settings
            .generate_in_place(&mut atlas)
            .context("Compact5 generation failed")?;
        atlas
            .save(&self.output)
            .with_context(|| format!("Failed to save image: {}", self.output.display()))?;
        info!("Wrote {}", self.output.display());

        if let Some(path) = &self.preview {
            let mut preview = atlas;
            paint_layout_overlay(
                &mut preview,
                &self.settings.layout(),
                self.settings.margin(),
                &PREVIEW_COLORS,
            )?;
            preview
                .save(path)
                .with_context(|| format!("Failed to save preview: {}", path.display()))?;
            info!("Wrote preview {}", path.display());
        }

        Ok(())
    }
}
