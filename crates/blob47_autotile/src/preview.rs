//! Connectivity previews for authoring
//!
//! Paints each layout slot with the connectivity its case stands for, so an
//! artist can check a hand-made or generated atlas against the expected
//! layout at a glance.

use crate::compact5::{
    out_of_bounds, validate_geometry, Band, BlitTarget, Compact5Role, TileBands,
};
use crate::connectivity::{mask_from_case_index, CASE_COUNT};
use crate::layout::BlobLayout;
use crate::AutotileError;
use blob47_core::{Coord, PixelRect, SurfaceMut};

/// Pixel values used by [`paint_layout_overlay`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColors<P> {
    pub disconnected: P,
    pub connected: P,
    /// Outline and margin guides of the 5 reference slots
    pub reference: P,
}

/// Mask bit shown by a band, `None` for the centre
pub fn band_bit(band: Band) -> Option<u8> {
    match band as u8 {
        i @ 0..=3 => Some(1 << i),
        4 => None,
        i => Some(1 << (i - 1)),
    }
}

/// Band rectangles of a tile tagged with whether `mask` connects them
///
/// The centre band is always reported as connected.
pub fn connection_overlay(
    mask: u8,
    tile_res: Coord,
    margin: Coord,
) -> Result<[(Band, PixelRect, bool); 9], AutotileError> {
    let bands = TileBands::new(tile_res, margin)?;
    Ok(Band::ALL.map(|band| {
        let connected = band_bit(band).map_or(true, |bit| mask & bit != 0);
        (band, bands.band(band), connected)
    }))
}

/// Paint the connectivity overlay of every case of `layout` onto `surface`
///
/// Every slot is bounds-checked before anything is painted.
pub fn paint_layout_overlay<D>(
    surface: &mut D,
    layout: &BlobLayout,
    margin: Coord,
    colors: &OverlayColors<D::Pixel>,
) -> Result<(), AutotileError>
where
    D: SurfaceMut + ?Sized,
{
    validate_geometry(layout.tile_res, margin)?;
    for case in 0..CASE_COUNT as u8 {
        let rect = layout.tile_rect(case);
        surface
            .check_rect(rect)
            .map_err(|e| out_of_bounds(BlitTarget::Destination(case), e))?;
    }

    for case in 0..CASE_COUNT as u8 {
        let mask = mask_from_case_index(case)?;
        let origin = layout.tile_position(case);
        for (_, rect, connected) in connection_overlay(mask, layout.tile_res, margin)? {
            let color = if connected {
                colors.connected
            } else {
                colors.disconnected
            };
            fill(surface, case, rect.offset(origin), color)?;
        }
    }

    for role in Compact5Role::ALL {
        let rect = layout.tile_rect(role.case_index());
        for line in reference_guides(rect, margin) {
            fill(surface, role.case_index(), line, colors.reference)?;
        }
    }

    Ok(())
}

/// One-pixel outline of `tile` plus its four margin lines
fn reference_guides(tile: PixelRect, margin: Coord) -> [PixelRect; 8] {
    let Coord { x, y } = tile.position;
    let Coord { x: w, y: h } = tile.size;
    [
        PixelRect::new(x, y, w, 1),
        PixelRect::new(x, y + h - 1, w, 1),
        PixelRect::new(x, y, 1, h),
        PixelRect::new(x + w - 1, y, 1, h),
        PixelRect::new(x + margin.x, y, 1, h),
        PixelRect::new(x + w - margin.x, y, 1, h),
        PixelRect::new(x, y + margin.y, w, 1),
        PixelRect::new(x, y + h - margin.y, w, 1),
    ]
}

fn fill<D>(
    surface: &mut D,
    case: u8,
    rect: PixelRect,
    color: D::Pixel,
) -> Result<(), AutotileError>
where
    D: SurfaceMut + ?Sized,
{
    surface
        .fill_rect(rect, color)
        .map_err(|e| out_of_bounds(BlitTarget::Destination(case), e))
}
