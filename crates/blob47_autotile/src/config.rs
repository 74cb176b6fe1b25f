//! Compact5 generation settings
//!
//! Settings describe one generation run over one blob tile group. They can be
//! stored next to the atlas as TOML or JSON so a run can be repeated after the
//! reference tiles are repainted.

use crate::compact5::{
    default_margin, expand_compact5_in_place, validate_geometry, Destination, ReferencePositions,
};
use crate::layout::BlobLayout;
use crate::AutotileError;
use blob47_core::{Coord, SurfaceMut};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Settings for generating a blob tile group from its Compact5 references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compact5Settings {
    /// Pixel size of one tile
    pub tile_res: Coord,
    /// Corner band thickness; a third of the tile when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Coord>,
    /// Top-left pixel of the group's 12x4 layout in the atlas
    #[serde(default)]
    pub layout_origin: Coord,
    /// Where the 5 reference tiles are read from; their own layout slots when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_positions: Option<ReferencePositions>,
}

impl Compact5Settings {
    pub fn new(tile_res: Coord) -> Self {
        Self {
            tile_res,
            margin: None,
            layout_origin: Coord::ZERO,
            reference_positions: None,
        }
    }

    pub fn with_margin(mut self, margin: Coord) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_layout_origin(mut self, origin: Coord) -> Self {
        self.layout_origin = origin;
        self
    }

    pub fn with_reference_positions(mut self, positions: ReferencePositions) -> Self {
        self.reference_positions = Some(positions);
        self
    }

    /// Load settings from a `.json` file, or TOML for any other extension
    pub fn load(path: &Path) -> Result<Self, AutotileError> {
        let content = std::fs::read_to_string(path)?;
        let settings = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!("Loaded Compact5 settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as JSON or TOML depending on the file extension
    pub fn save(&self, path: &Path) -> Result<(), AutotileError> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| AutotileError::Config(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| AutotileError::Config(e.to_string()))?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AutotileError> {
        let settings: Self =
            toml::from_str(content).map_err(|e| AutotileError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(content: &str) -> Result<Self, AutotileError> {
        let settings: Self =
            serde_json::from_str(content).map_err(|e| AutotileError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject tile sizes and margins that cannot be split into bands
    pub fn validate(&self) -> Result<(), AutotileError> {
        validate_geometry(self.tile_res, self.margin())
    }

    /// Effective margin
    pub fn margin(&self) -> Coord {
        self.margin.unwrap_or_else(|| default_margin(self.tile_res))
    }

    pub fn layout(&self) -> BlobLayout {
        BlobLayout::new(self.layout_origin, self.tile_res)
    }

    /// Effective reference tile positions
    pub fn references(&self) -> ReferencePositions {
        self.reference_positions
            .unwrap_or_else(|| ReferencePositions::from_layout(&self.layout()))
    }

    /// Run the generation on `image`, which holds both references and layout
    pub fn generate_in_place<D>(&self, image: &mut D) -> Result<(), AutotileError>
    where
        D: SurfaceMut + ?Sized,
    {
        expand_compact5_in_place(
            image,
            self.tile_res,
            &self.references(),
            self.margin(),
            Destination::LayoutOrigin(self.layout_origin),
        )
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
