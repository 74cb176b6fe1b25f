//! Blob47 connected-texture autotiling
//!
//! This crate resolves which of the 47 "blob" tile variants to draw for a cell
//! given its 8 neighbors, and can synthesize all 47 variants from 5 painted
//! reference tiles ("Compact5").
//!
//! # Features
//! - Constant-time mask -> case lookup for all 256 neighbor masks
//! - Standard 12x4 tile layout with pixel and UV helpers for meshers
//! - Compact5 atlas generation, including in-place generation where the
//!   reference tiles live inside the layout being written
//! - Connectivity preview painting for authoring tools
//!
//! # Example
//!
//! ```rust,ignore
//! use blob47_autotile::{neighbors, BlobLayout, Compact5Settings};
//! use blob47_core::Coord;
//!
//! // Mesh time: pick the tile for a cell connected east and west
//! let layout = BlobLayout::new(Coord::ZERO, Coord::new(16, 16));
//! let rect = layout.rect_for_mask(neighbors::W | neighbors::E);
//!
//! // Authoring time: fill the layout from the 5 reference tiles
//! let mut atlas = image::open("blocks.png")?.to_rgba8();
//! Compact5Settings::new(Coord::new(16, 16)).generate_in_place(&mut atlas)?;
//! ```

pub mod compact5;
pub mod config;
pub mod connectivity;
pub mod layout;
pub mod preview;

// Re-export main types at crate root
pub use compact5::{
    composition, default_margin, expand_compact5, expand_compact5_in_place,
    generate_layout_in_place, margin_limits, validate_geometry, Band, BandBlit, BlitTarget,
    Compact5Role, Destination, ReferencePositions, TileBands, COMPACT5_REFERENCE_CASES,
    COMPACT5_TILE_COUNT,
};
pub use config::Compact5Settings;
pub use connectivity::{
    calculate_mask, case_index_from_mask, mask_from_case_index, neighbors, normalize_mask,
    CASE_COUNT,
};
pub use layout::{
    case_index_from_grid_coords, grid_coords_from_case_index, grid_coords_from_mask, BlobLayout,
    LAYOUT_COLUMNS, LAYOUT_ROWS,
};
pub use preview::{band_bit, connection_overlay, paint_layout_overlay, OverlayColors};

// Re-export blob47_core
pub use blob47_core;

use blob47_core::{Coord, PixelRect};
use thiserror::Error;

/// Errors that can occur when resolving cases or generating tiles
#[derive(Debug, Error)]
pub enum AutotileError {
    #[error("case index {0} is out of range (expected 0..47)")]
    CaseOutOfRange(u8),
    #[error("margin {margin} does not fit tile resolution {tile_res}")]
    InvalidGeometry { tile_res: Coord, margin: Coord },
    #[error("{target} at {rect} is outside image bounds {bounds}")]
    OutOfBounds {
        target: BlitTarget,
        rect: PixelRect,
        bounds: PixelRect,
    },
    #[error("Settings error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
