//! Blob47 layout: case index <-> tile grid coordinates <-> atlas pixels
//!
//! The 47 cases are laid out row-major in a 12x4 grid; the last slot
//! (column 11, row 3) is unused.

use crate::connectivity::{case_index_from_mask, CASE_COUNT};
use blob47_core::{Coord, PixelRect};
use serde::{Deserialize, Serialize};

/// Columns in the blob layout
pub const LAYOUT_COLUMNS: i32 = 12;
/// Rows in the blob layout
pub const LAYOUT_ROWS: i32 = 4;

/// Grid `(column, row)` of a case index
///
/// Only meaningful for `case_index < 47`.
#[inline]
pub fn grid_coords_from_case_index(case_index: u8) -> (i32, i32) {
    debug_assert!((case_index as usize) < CASE_COUNT);
    let i = case_index as i32;
    (i % LAYOUT_COLUMNS, i / LAYOUT_COLUMNS)
}

/// Grid `(column, row)` of the tile to draw for a connectivity mask
#[inline]
pub fn grid_coords_from_mask(mask: u8) -> (i32, i32) {
    grid_coords_from_case_index(case_index_from_mask(mask))
}

/// Case index at grid `(column, row)`, or `None` outside the 47 used slots
pub fn case_index_from_grid_coords(column: i32, row: i32) -> Option<u8> {
    if !(0..LAYOUT_COLUMNS).contains(&column) || !(0..LAYOUT_ROWS).contains(&row) {
        return None;
    }
    let i = column + row * LAYOUT_COLUMNS;
    if (i as usize) < CASE_COUNT {
        Some(i as u8)
    } else {
        None
    }
}

/// Placement of one blob tile group inside a larger atlas
///
/// `origin` is the pixel position of the group's top-left tile (case 0), not
/// of the atlas itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLayout {
    pub origin: Coord,
    pub tile_res: Coord,
}

impl BlobLayout {
    pub fn new(origin: Coord, tile_res: Coord) -> Self {
        Self { origin, tile_res }
    }

    /// Pixel size of the whole 12x4 group, clamped to the `i32` range
    pub fn pixel_size(&self) -> Coord {
        self.tile_res.saturating_mul(Coord::new(LAYOUT_COLUMNS, LAYOUT_ROWS))
    }

    /// Pixel rectangle of the whole 12x4 group, reserved slot included
    pub fn pixel_rect(&self) -> PixelRect {
        PixelRect::from_position_size(self.origin, self.pixel_size())
    }

    /// Top-left pixel of a case's tile
    ///
    /// `case_index` must be below 47. Larger indices trip a debug assertion;
    /// in release builds they land on rows past the bottom of the layout.
    /// Positions that do not fit in `i32` are clamped, so they still fail
    /// any bounds check instead of wrapping around.
    pub fn tile_position(&self, case_index: u8) -> Coord {
        let grid: Coord = grid_coords_from_case_index(case_index).into();
        self.origin.saturating_add(grid.saturating_mul(self.tile_res))
    }

    /// Pixel rectangle of a case's tile
    ///
    /// Same precondition as [`BlobLayout::tile_position`].
    pub fn tile_rect(&self, case_index: u8) -> PixelRect {
        PixelRect::from_position_size(self.tile_position(case_index), self.tile_res)
    }

    /// Pixel rectangle of the tile to draw for a connectivity mask
    pub fn rect_for_mask(&self, mask: u8) -> PixelRect {
        self.tile_rect(case_index_from_mask(mask))
    }

    /// Top-left pixel of every case, indexed by case
    pub fn positions(&self) -> [Coord; CASE_COUNT] {
        std::array::from_fn(|i| self.tile_position(i as u8))
    }

    /// Normalized `[u0, v0, u1, v1]` of the tile for `mask` in an atlas of
    /// `atlas_size` pixels
    pub fn uv_rect(&self, mask: u8, atlas_size: Coord) -> [f32; 4] {
        let rect = self.rect_for_mask(mask);
        let end = rect.end();
        let w = atlas_size.x as f32;
        let h = atlas_size.y as f32;
        [
            rect.position.x as f32 / w,
            rect.position.y as f32 / h,
            end.x as f32 / w,
            end.y as f32 / h,
        ]
    }
}
