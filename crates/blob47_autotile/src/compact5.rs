//! Compact5: synthesize all 47 blob tiles from 5 reference tiles
//!
//! Artists paint five tiles (point, horizontal, vertical, cross, full). Every
//! tile is split into a 3x3 grid of bands by a margin: four corners, four
//! edges and a centre. Each blob case is assembled by copying bands from the
//! reference tile whose connectivity matches the case on that band's side:
//!
//! - a corner with neither adjacent side connected comes from `Point`
//! - a corner with one side connected comes from `Horizontal` or `Vertical`
//! - a concave corner (both sides, no diagonal) comes from `Cross`
//! - a filled corner (both sides and the diagonal) comes from `Full`
//! - an edge comes from a tile that has the same connection on that side
//!
//! The rules are stored per case in [`composition`], with adjacent bands of
//! the same source merged into single rectangles.

use crate::connectivity::CASE_COUNT;
use crate::layout::BlobLayout;
use crate::AutotileError;
use blob47_core::{Coord, PixelGrid, PixelRect, Surface, SurfaceMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use tracing::{debug, warn};

/// Number of reference tiles
pub const COMPACT5_TILE_COUNT: usize = 5;

/// Blob case of each reference role, in role order
pub const COMPACT5_REFERENCE_CASES: [u8; COMPACT5_TILE_COUNT] = [0, 2, 24, 46, 26];

/// Role of a reference tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compact5Role {
    /// No neighbors
    Point,
    /// East and west only
    Horizontal,
    /// North and south only
    Vertical,
    /// All four sides, no diagonals
    Cross,
    /// Fully surrounded
    Full,
}

impl Compact5Role {
    pub const ALL: [Self; COMPACT5_TILE_COUNT] = [
        Self::Point,
        Self::Horizontal,
        Self::Vertical,
        Self::Cross,
        Self::Full,
    ];

    /// Blob case this reference tile represents
    pub const fn case_index(self) -> u8 {
        COMPACT5_REFERENCE_CASES[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Cross => "cross",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for Compact5Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel positions of the 5 reference tiles in a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePositions {
    pub point: Coord,
    pub horizontal: Coord,
    pub vertical: Coord,
    pub cross: Coord,
    pub full: Coord,
}

impl ReferencePositions {
    pub fn new(
        point: Coord,
        horizontal: Coord,
        vertical: Coord,
        cross: Coord,
        full: Coord,
    ) -> Self {
        Self {
            point,
            horizontal,
            vertical,
            cross,
            full,
        }
    }

    /// Reference tiles sitting in their own slots of a blob layout
    pub fn from_layout(layout: &BlobLayout) -> Self {
        Self {
            point: layout.tile_position(Compact5Role::Point.case_index()),
            horizontal: layout.tile_position(Compact5Role::Horizontal.case_index()),
            vertical: layout.tile_position(Compact5Role::Vertical.case_index()),
            cross: layout.tile_position(Compact5Role::Cross.case_index()),
            full: layout.tile_position(Compact5Role::Full.case_index()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Compact5Role, Coord)> + '_ {
        Compact5Role::ALL.into_iter().map(move |role| (role, self[role]))
    }
}

impl Index<Compact5Role> for ReferencePositions {
    type Output = Coord;

    fn index(&self, role: Compact5Role) -> &Coord {
        match role {
            Compact5Role::Point => &self.point,
            Compact5Role::Horizontal => &self.horizontal,
            Compact5Role::Vertical => &self.vertical,
            Compact5Role::Cross => &self.cross,
            Compact5Role::Full => &self.full,
        }
    }
}

/// One cell of the 3x3 band partition of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Band {
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    /// `(column, row)` in the 3x3 partition
    pub const fn cell(self) -> (usize, usize) {
        let i = self as usize;
        (i % 3, i / 3)
    }
}

/// Copy of a rectangular run of bands from one reference tile
///
/// The copied region is the bounding box of `from` and `to`, and lands at the
/// same place in the destination tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandBlit {
    pub role: Compact5Role,
    pub from: Band,
    pub to: Band,
}

impl BandBlit {
    /// Bands covered by this blit
    pub fn bands(&self) -> impl Iterator<Item = Band> {
        let (c0, r0) = self.from.cell();
        let (c1, r1) = self.to.cell();
        let (cols, rows) = (c0.min(c1)..=c0.max(c1), r0.min(r1)..=r0.max(r1));
        Band::ALL.into_iter().filter(move |band| {
            let (c, r) = band.cell();
            cols.contains(&c) && rows.contains(&r)
        })
    }
}

const fn span(role: Compact5Role, from: Band, to: Band) -> BandBlit {
    BandBlit { role, from, to }
}

const fn one(role: Compact5Role, band: Band) -> BandBlit {
    span(role, band, band)
}

const fn whole(role: Compact5Role) -> BandBlit {
    span(role, Band::TopLeft, Band::BottomRight)
}

static COMPOSITION: [&[BandBlit]; CASE_COUNT] = {
    use Band::*;
    use Compact5Role::*;
    [
        // 0
        &[whole(Point)],
        // 1
        &[span(Point, TopLeft, BottomLeft), span(Horizontal, Top, BottomRight)],
        // 2
        &[whole(Horizontal)],
        // 3
        &[span(Horizontal, TopLeft, Bottom), span(Point, TopRight, BottomRight)],
        // 4
        &[
            span(Cross, Center, BottomRight),
            span(Vertical, Left, BottomLeft),
            span(Horizontal, Top, TopRight),
            one(Point, TopLeft),
        ],
        // 5
        &[
            span(Cross, Left, Bottom),
            span(Vertical, Right, BottomRight),
            span(Horizontal, TopLeft, Top),
            one(Point, TopRight),
        ],
        // 6
        &[span(Vertical, TopLeft, Bottom), span(Cross, TopRight, BottomRight)],
        // 7
        &[span(Horizontal, TopLeft, TopRight), span(Cross, Left, BottomRight)],
        // 8
        &[span(Cross, BottomLeft, BottomRight), span(Cross, TopLeft, Left), span(Full, Top, Right)],
        // 9
        &[
            span(Cross, TopLeft, TopRight),
            span(Cross, Left, BottomLeft),
            span(Full, Center, BottomRight),
        ],
        // 10
        &[span(Full, TopLeft, Bottom), span(Cross, TopRight, BottomRight)],
        // 11
        &[span(Full, TopLeft, Right), span(Cross, BottomLeft, BottomRight)],
        // 12
        &[span(Point, TopLeft, TopRight), span(Vertical, Left, BottomRight)],
        // 13
        &[
            one(Point, TopLeft),
            span(Horizontal, Top, TopRight),
            span(Vertical, Left, BottomLeft),
            span(Full, Center, BottomRight),
        ],
        // 14
        &[span(Horizontal, TopLeft, TopRight), span(Full, Left, BottomRight)],
        // 15
        &[
            one(Point, TopRight),
            span(Horizontal, TopLeft, Top),
            span(Vertical, Right, BottomRight),
            span(Full, Left, Bottom),
        ],
        // 16
        &[
            span(Cross, Top, Right),
            span(Vertical, TopLeft, Left),
            span(Horizontal, Bottom, BottomRight),
            one(Point, BottomLeft),
        ],
        // 17
        &[
            span(Cross, TopLeft, Center),
            span(Vertical, TopRight, Right),
            span(Horizontal, BottomLeft, Bottom),
            one(Point, BottomRight),
        ],
        // 18
        &[span(Cross, TopLeft, Right), span(Horizontal, BottomLeft, BottomRight)],
        // 19
        &[span(Cross, TopLeft, Bottom), span(Vertical, TopRight, BottomRight)],
        // 20
        &[
            span(Full, TopLeft, Center),
            span(Cross, BottomLeft, BottomRight),
            span(Cross, TopRight, Right),
        ],
        // 21
        &[
            span(Full, Left, Bottom),
            span(Cross, TopLeft, TopRight),
            span(Cross, Right, BottomRight),
        ],
        // 22
        &[span(Full, Left, BottomRight), span(Cross, TopLeft, TopRight)],
        // 23
        &[span(Full, Top, BottomRight), span(Cross, TopLeft, BottomLeft)],
        // 24
        &[whole(Vertical)],
        // 25
        &[span(Vertical, TopLeft, BottomLeft), span(Full, Top, BottomRight)],
        // 26
        &[whole(Full)],
        // 27
        &[span(Full, TopLeft, Bottom), span(Vertical, TopRight, BottomRight)],
        // 28
        &[
            span(Vertical, TopLeft, BottomLeft),
            span(Cross, Top, TopRight),
            span(Full, Center, BottomRight),
        ],
        // 29
        &[
            span(Horizontal, TopLeft, TopRight),
            span(Cross, Right, BottomRight),
            span(Full, Left, Bottom),
        ],
        // 30
        &[
            span(Vertical, TopLeft, BottomLeft),
            span(Cross, Bottom, BottomRight),
            span(Full, Top, Right),
        ],
        // 31
        &[
            span(Horizontal, TopLeft, TopRight),
            span(Cross, Left, BottomLeft),
            span(Full, Center, BottomRight),
        ],
        // 32
        &[span(Full, TopLeft, Right), span(Full, BottomLeft, Bottom), one(Cross, BottomRight)],
        // 33
        &[span(Full, TopLeft, Right), span(Full, Bottom, BottomRight), one(Cross, BottomLeft)],
        // 34
        &[
            one(Cross, TopLeft),
            span(Full, Top, TopRight),
            span(Full, Left, Right),
            span(Full, BottomLeft, Bottom),
            one(Cross, BottomRight),
        ],
        // 35
        &[
            one(Cross, TopRight),
            span(Full, TopLeft, Top),
            span(Full, Left, Right),
            span(Full, Bottom, BottomRight),
            one(Cross, BottomLeft),
        ],
        // 36
        &[span(Vertical, TopLeft, Right), span(Point, BottomLeft, BottomRight)],
        // 37
        &[
            span(Vertical, TopLeft, Left),
            span(Horizontal, Bottom, BottomRight),
            one(Point, BottomLeft),
            span(Full, Top, Right),
        ],
        // 38
        &[span(Full, TopLeft, Right), span(Horizontal, BottomLeft, BottomRight)],
        // 39
        &[
            span(Full, TopLeft, Center),
            span(Horizontal, BottomLeft, Bottom),
            span(Vertical, TopRight, Right),
            one(Point, BottomRight),
        ],
        // 40
        &[
            span(Cross, TopLeft, Left),
            span(Full, Top, Right),
            span(Horizontal, BottomLeft, BottomRight),
        ],
        // 41
        &[
            span(Full, TopLeft, Center),
            span(Vertical, TopRight, BottomRight),
            span(Cross, BottomLeft, Bottom),
        ],
        // 42
        &[
            span(Full, TopLeft, Center),
            span(Cross, TopRight, Right),
            span(Horizontal, BottomLeft, BottomRight),
        ],
        // 43
        &[
            span(Cross, TopLeft, Top),
            span(Full, Left, Bottom),
            span(Vertical, TopRight, BottomRight),
        ],
        // 44
        &[span(Full, TopLeft, Top), one(Cross, TopRight), span(Full, Left, BottomRight)],
        // 45
        &[one(Cross, TopLeft), span(Full, Top, TopRight), span(Full, Left, BottomRight)],
        // 46
        &[whole(Cross)],
    ]
};

/// Composition rule of a case: the band copies that assemble its tile
pub fn composition(case_index: u8) -> Result<&'static [BandBlit], AutotileError> {
    COMPOSITION
        .get(case_index as usize)
        .copied()
        .ok_or(AutotileError::CaseOutOfRange(case_index))
}

/// Default margin for a tile resolution: a third of the tile on each axis
pub fn default_margin(tile_res: Coord) -> Coord {
    (tile_res / 3).max(Coord::splat(1))
}

/// Inclusive `(min, max)` margin accepted for a tile resolution
pub fn margin_limits(tile_res: Coord) -> (Coord, Coord) {
    (Coord::splat(1), tile_res / 2)
}

/// Check that `margin` splits a `tile_res` tile into 9 non-inverted bands
pub fn validate_geometry(tile_res: Coord, margin: Coord) -> Result<(), AutotileError> {
    let (min, max) = margin_limits(tile_res);
    let valid = tile_res.x > 0
        && tile_res.y > 0
        && (min.x..=max.x).contains(&margin.x)
        && (min.y..=max.y).contains(&margin.y);
    if valid {
        Ok(())
    } else {
        Err(AutotileError::InvalidGeometry { tile_res, margin })
    }
}

/// The 9 band rectangles of a tile, relative to the tile's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBands {
    rects: [PixelRect; 9],
}

impl TileBands {
    pub fn new(tile_res: Coord, margin: Coord) -> Result<Self, AutotileError> {
        validate_geometry(tile_res, margin)?;

        let middle = tile_res - margin * 2;
        let xs = [0, margin.x, margin.x + middle.x];
        let ws = [margin.x, middle.x, margin.x];
        let ys = [0, margin.y, margin.y + middle.y];
        let hs = [margin.y, middle.y, margin.y];

        let rects = Band::ALL.map(|band| {
            let (c, r) = band.cell();
            PixelRect::new(xs[c], ys[r], ws[c], hs[r])
        });
        Ok(Self { rects })
    }

    pub fn band(&self, band: Band) -> PixelRect {
        self.rects[band as usize]
    }

    /// Tile-relative rectangle copied by `blit`
    pub fn blit_rect(&self, blit: &BandBlit) -> PixelRect {
        self.band(blit.from).merge(&self.band(blit.to))
    }
}

/// What a rejected rectangle belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitTarget {
    Reference(Compact5Role),
    Destination(u8),
}

impl fmt::Display for BlitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference(role) => write!(f, "{role} reference tile"),
            Self::Destination(case) => write!(f, "destination tile for case {case}"),
        }
    }
}

/// Where the 47 generated tiles go
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    /// Standard 12x4 layout anchored at this pixel
    LayoutOrigin(Coord),
    /// Explicit top-left pixel for every case
    Positions(&'a [Coord; CASE_COUNT]),
}

impl Destination<'_> {
    pub fn resolve(&self, tile_res: Coord) -> [Coord; CASE_COUNT] {
        match self {
            Self::LayoutOrigin(origin) => BlobLayout::new(*origin, tile_res).positions(),
            Self::Positions(positions) => **positions,
        }
    }
}

pub(crate) fn out_of_bounds(target: BlitTarget, err: blob47_core::SurfaceError) -> AutotileError {
    match err {
        blob47_core::SurfaceError::OutOfBounds { rect, bounds } => {
            AutotileError::OutOfBounds {
                target,
                rect,
                bounds,
            }
        }
    }
}

/// Generate all 47 blob tiles from the 5 reference tiles of `source`
///
/// Geometry and every source and destination rectangle are validated before
/// the first pixel is written: on error `destination` is left untouched.
/// Only the 47 destination tile rectangles are written.
pub fn expand_compact5<S, D>(
    source: &S,
    tile_res: Coord,
    references: &ReferencePositions,
    margin: Coord,
    destination: &mut D,
    targets: Destination<'_>,
) -> Result<(), AutotileError>
where
    S: Surface + ?Sized,
    D: SurfaceMut<Pixel = S::Pixel> + ?Sized,
{
    let bands = TileBands::new(tile_res, margin)
        .inspect_err(|e| warn!("Compact5 expansion rejected: {e}"))?;
    let positions = targets.resolve(tile_res);

    check_references(source, tile_res, references)?;
    for (case, position) in positions.iter().enumerate() {
        let rect = PixelRect::from_position_size(*position, tile_res);
        destination.check_rect(rect).map_err(|e| {
            let err = out_of_bounds(BlitTarget::Destination(case as u8), e);
            warn!("Compact5 expansion rejected: {err}");
            err
        })?;
    }

    debug!(
        "Expanding Compact5 tiles: tile_res={}, margin={}, first tile at {}",
        tile_res, margin, positions[0]
    );

    for (case, rules) in COMPOSITION.iter().enumerate() {
        let tile_origin = positions[case];
        for blit in rules.iter() {
            let rect = bands.blit_rect(blit);
            copy_band(
                source,
                blit.role,
                rect.offset(references[blit.role]),
                destination,
                case as u8,
                tile_origin.saturating_add(rect.position),
            )?;
        }
    }

    Ok(())
}

/// Copy one run of bands, blaming a rejected rectangle on the side it belongs to
///
/// The whole-tile checks in [`expand_compact5`] run first, so neither error is
/// reached from there.
fn copy_band<S, D>(
    source: &S,
    role: Compact5Role,
    src_rect: PixelRect,
    destination: &mut D,
    case: u8,
    dst_position: Coord,
) -> Result<(), AutotileError>
where
    S: Surface + ?Sized,
    D: SurfaceMut<Pixel = S::Pixel> + ?Sized,
{
    source
        .check_rect(src_rect)
        .map_err(|e| out_of_bounds(BlitTarget::Reference(role), e))?;
    destination
        .blit_rect(source, src_rect, dst_position)
        .map_err(|e| out_of_bounds(BlitTarget::Destination(case), e))
}

/// Like [`expand_compact5`], for reference tiles stored in the image being written
///
/// The reference tiles are snapshotted into a scratch sheet first, so targets
/// may overlap them (as they do in the standard layout, where each reference
/// tile sits in its own case's slot).
pub fn expand_compact5_in_place<D>(
    image: &mut D,
    tile_res: Coord,
    references: &ReferencePositions,
    margin: Coord,
    targets: Destination<'_>,
) -> Result<(), AutotileError>
where
    D: SurfaceMut + ?Sized,
{
    validate_geometry(tile_res, margin)
        .inspect_err(|e| warn!("Compact5 expansion rejected: {e}"))?;
    check_references(&*image, tile_res, references)?;

    let sheet_size = tile_res.saturating_mul(Coord::new(COMPACT5_TILE_COUNT as i32, 1));
    let width = tile_res.x as u32;
    let sheet = PixelGrid::from_fn(sheet_size, |x, y| {
        let origin = references[Compact5Role::ALL[(x / width) as usize]];
        image.pixel_at(origin.x as u32 + x % width, origin.y as u32 + y)
    });
    let sheet_references = ReferencePositions::new(
        Coord::new(0, 0),
        Coord::new(tile_res.x, 0),
        Coord::new(tile_res.x * 2, 0),
        Coord::new(tile_res.x * 3, 0),
        Coord::new(tile_res.x * 4, 0),
    );

    expand_compact5(&sheet, tile_res, &sheet_references, margin, image, targets)
}

/// Fill a whole blob layout from the reference tiles in its own slots
pub fn generate_layout_in_place<D>(
    image: &mut D,
    layout: &BlobLayout,
    margin: Coord,
) -> Result<(), AutotileError>
where
    D: SurfaceMut + ?Sized,
{
    expand_compact5_in_place(
        image,
        layout.tile_res,
        &ReferencePositions::from_layout(layout),
        margin,
        Destination::LayoutOrigin(layout.origin),
    )
}

fn check_references<S>(
    source: &S,
    tile_res: Coord,
    references: &ReferencePositions,
) -> Result<(), AutotileError>
where
    S: Surface + ?Sized,
{
    for (role, position) in references.iter() {
        let rect = PixelRect::from_position_size(position, tile_res);
        source.check_rect(rect).map_err(|e| {
            let err = out_of_bounds(BlitTarget::Reference(role), e);
            warn!("Compact5 expansion rejected: {err}");
            err
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::neighbors::*;
    use crate::connectivity::{case_index_from_mask, mask_from_case_index};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const TILE: Coord = Coord::new(16, 16);
    const MARGIN: Coord = Coord::new(5, 5);
    const AT_ORIGIN: Destination<'static> = Destination::LayoutOrigin(Coord::ZERO);

    /// Source sheet with the 5 reference tiles side by side, each filled with
    /// its role index + 1
    fn role_sheet(tile_res: Coord) -> (PixelGrid<u8>, ReferencePositions) {
        let sheet = PixelGrid::from_fn(Coord::new(tile_res.x * 5, tile_res.y), |x, _| {
            (x / tile_res.x as u32) as u8 + 1
        });
        let refs = ReferencePositions::new(
            Coord::new(0, 0),
            Coord::new(tile_res.x, 0),
            Coord::new(tile_res.x * 2, 0),
            Coord::new(tile_res.x * 3, 0),
            Coord::new(tile_res.x * 4, 0),
        );
        (sheet, refs)
    }

    fn role_value(role: Compact5Role) -> u8 {
        role as u8 + 1
    }

    /// Neighbor bits a band's content depends on
    fn relevant_bits(band: Band) -> u8 {
        match band {
            Band::TopLeft => N | W | NW,
            Band::Top => N,
            Band::TopRight => N | E | NE,
            Band::Left => W,
            Band::Center => 0,
            Band::Right => E,
            Band::BottomLeft => S | W | SW,
            Band::Bottom => S,
            Band::BottomRight => S | E | SE,
        }
    }

    #[test]
    fn test_reference_cases_match_connectivity() {
        assert_eq!(Compact5Role::Point.case_index(), case_index_from_mask(0));
        assert_eq!(Compact5Role::Horizontal.case_index(), case_index_from_mask(W | E));
        assert_eq!(Compact5Role::Vertical.case_index(), case_index_from_mask(N | S));
        assert_eq!(Compact5Role::Cross.case_index(), case_index_from_mask(ORTHOGONAL));
        assert_eq!(Compact5Role::Full.case_index(), case_index_from_mask(ALL));
    }

    #[test]
    fn test_reference_tiles_copy_themselves_whole() {
        for role in Compact5Role::ALL {
            let rules = composition(role.case_index()).unwrap();
            assert_eq!(rules, &[whole(role)]);
        }
    }

    #[test]
    fn test_every_case_covers_each_band_once() {
        for case in 0..CASE_COUNT as u8 {
            let rules = composition(case).unwrap();
            assert!((1..=5).contains(&rules.len()), "case {case}");

            let mut counts = [0u8; 9];
            for blit in rules {
                for band in blit.bands() {
                    counts[band as usize] += 1;
                }
            }
            assert_eq!(counts, [1; 9], "case {case}");
        }
        assert!(composition(47).is_err());
    }

    #[test]
    fn test_band_sources_agree_with_connectivity() {
        // Each band must come from a reference tile that has the same
        // connections as the destination on that band's sides.
        for case in 0..CASE_COUNT as u8 {
            let mask = mask_from_case_index(case).unwrap();
            for blit in composition(case).unwrap() {
                let source_mask = mask_from_case_index(blit.role.case_index()).unwrap();
                for band in blit.bands() {
                    let bits = relevant_bits(band);
                    assert_eq!(
                        source_mask & bits,
                        mask & bits,
                        "case {case}, band {band:?} from {}",
                        blit.role
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_sources() {
        // Concave inner corners come from Cross, filled corners from Full
        let rules = composition(case_index_from_mask(ALL & !NE)).unwrap();
        let top_right = rules
            .iter()
            .find(|b| b.bands().any(|band| band == Band::TopRight))
            .unwrap();
        assert_eq!(top_right.role, Compact5Role::Cross);
        let bottom_left = rules
            .iter()
            .find(|b| b.bands().any(|band| band == Band::BottomLeft))
            .unwrap();
        assert_eq!(bottom_left.role, Compact5Role::Full);
    }

    #[test]
    fn test_tile_bands_partition_tile() {
        for (tile_res, margin) in [
            (Coord::new(16, 16), Coord::new(5, 5)),
            (Coord::new(16, 16), Coord::new(8, 8)),
            (Coord::new(15, 9), Coord::new(7, 1)),
            (Coord::new(3, 3), Coord::new(1, 1)),
        ] {
            let bands = TileBands::new(tile_res, margin).unwrap();
            let mut counts = vec![0u8; (tile_res.x * tile_res.y) as usize];
            for band in Band::ALL {
                let rect = bands.band(band);
                assert!(rect.size.x >= 0 && rect.size.y >= 0);
                for y in rect.position.y..rect.end().y {
                    for x in rect.position.x..rect.end().x {
                        counts[(y * tile_res.x + x) as usize] += 1;
                    }
                }
            }
            assert!(counts.iter().all(|&c| c == 1), "{tile_res} / {margin}");
        }
    }

    #[test]
    fn test_tile_bands_layout() {
        let bands = TileBands::new(TILE, MARGIN).unwrap();
        assert_eq!(bands.band(Band::TopLeft), PixelRect::new(0, 0, 5, 5));
        assert_eq!(bands.band(Band::Top), PixelRect::new(5, 0, 6, 5));
        assert_eq!(bands.band(Band::Center), PixelRect::new(5, 5, 6, 6));
        assert_eq!(bands.band(Band::BottomRight), PixelRect::new(11, 11, 5, 5));
        assert_eq!(
            bands.blit_rect(&span(Compact5Role::Cross, Band::Center, Band::BottomRight)),
            PixelRect::new(5, 5, 11, 11)
        );
    }

    #[test]
    fn test_invalid_geometry() {
        for (tile_res, margin) in [
            (TILE, Coord::new(0, 5)),
            (TILE, Coord::new(5, 0)),
            (TILE, Coord::new(9, 5)),
            (TILE, Coord::new(5, 9)),
            (TILE, Coord::new(-1, 5)),
            (Coord::new(0, 16), Coord::new(1, 1)),
            (Coord::new(1, 1), Coord::new(1, 1)),
        ] {
            assert!(matches!(
                TileBands::new(tile_res, margin),
                Err(AutotileError::InvalidGeometry { .. })
            ));
        }
        assert!(validate_geometry(TILE, Coord::new(8, 1)).is_ok());
    }

    #[test]
    fn test_default_margin() {
        assert_eq!(default_margin(Coord::new(16, 16)), Coord::new(5, 5));
        assert_eq!(default_margin(Coord::new(32, 8)), Coord::new(10, 2));
        assert_eq!(default_margin(Coord::new(2, 2)), Coord::new(1, 1));
        assert_eq!(margin_limits(Coord::new(16, 9)), (Coord::splat(1), Coord::new(8, 4)));
    }

    #[test]
    fn test_expand_fills_every_tile() {
        let (sheet, refs) = role_sheet(TILE);
        let layout = BlobLayout::new(Coord::new(8, 4), TILE);
        let size = layout.pixel_size() + Coord::new(16, 8);
        let mut dest = PixelGrid::new(size, 0u8);

        expand_compact5(
            &sheet,
            TILE,
            &refs,
            MARGIN,
            &mut dest,
            Destination::LayoutOrigin(layout.origin),
        )
        .unwrap();

        let tiles: Vec<PixelRect> = (0..CASE_COUNT as u8).map(|c| layout.tile_rect(c)).collect();
        for y in 0..size.y {
            for x in 0..size.x {
                let p = Coord::new(x, y);
                let value = dest.get(x as u32, y as u32).unwrap();
                if tiles.iter().any(|t| t.contains(p)) {
                    assert_ne!(value, 0, "unwritten pixel at {p}");
                } else {
                    assert_eq!(value, 0, "stray write at {p}");
                }
            }
        }
    }

    #[test]
    fn test_expand_anchor_tiles() {
        let (sheet, refs) = role_sheet(TILE);
        let layout = BlobLayout::new(Coord::ZERO, TILE);
        let mut dest = PixelGrid::new(layout.pixel_size(), 0u8);

        expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, AT_ORIGIN).unwrap();

        let tile_values = |case: u8| {
            let rect = layout.tile_rect(case);
            PixelGrid::copy_from(&dest, rect).unwrap().pixels().to_vec()
        };
        for role in Compact5Role::ALL {
            assert!(tile_values(role.case_index())
                .iter()
                .all(|&v| v == role_value(role)));
        }

        // Lone east neighbor: west half reads as a point, east side as horizontal
        let rect = layout.tile_rect(case_index_from_mask(E));
        let west = dest.get(rect.position.x as u32, rect.position.y as u32 + 8);
        let east = dest.get(rect.end().x as u32 - 1, rect.position.y as u32 + 8);
        assert_eq!(west, Some(role_value(Compact5Role::Point)));
        assert_eq!(east, Some(role_value(Compact5Role::Horizontal)));
    }

    #[test]
    fn test_expand_copies_pixels_exactly() {
        let mut rng = SmallRng::seed_from_u64(47);
        let source = PixelGrid::from_fn(Coord::new(64, 48), |_, _| rng.gen::<u32>());
        let refs = ReferencePositions::new(
            Coord::new(0, 0),
            Coord::new(20, 3),
            Coord::new(40, 0),
            Coord::new(3, 25),
            Coord::new(30, 30),
        );
        let tile_res = Coord::new(12, 10);
        let margin = Coord::new(4, 3);
        let layout = BlobLayout::new(Coord::ZERO, tile_res);
        let mut dest = PixelGrid::new(layout.pixel_size(), 0u32);

        expand_compact5(&source, tile_res, &refs, margin, &mut dest, AT_ORIGIN).unwrap();

        let bands = TileBands::new(tile_res, margin).unwrap();
        for case in 0..CASE_COUNT as u8 {
            let tile = layout.tile_position(case);
            for blit in composition(case).unwrap() {
                let rect = bands.blit_rect(blit);
                let src = refs[blit.role] + rect.position;
                let dst = tile + rect.position;
                for dy in 0..rect.size.y {
                    for dx in 0..rect.size.x {
                        assert_eq!(
                            dest.get((dst.x + dx) as u32, (dst.y + dy) as u32),
                            source.get((src.x + dx) as u32, (src.y + dy) as u32),
                            "case {case}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_expand_to_explicit_positions() {
        let (sheet, refs) = role_sheet(TILE);
        // Single column, cases in reverse order
        let positions: [Coord; CASE_COUNT] =
            std::array::from_fn(|i| Coord::new(0, (CASE_COUNT - 1 - i) as i32 * TILE.y));
        let mut dest = PixelGrid::new(Coord::new(TILE.x, TILE.y * CASE_COUNT as i32), 0u8);

        let targets = Destination::Positions(&positions);
        expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, targets).unwrap();

        assert!(dest.pixels().iter().all(|&v| v != 0));
        // Case 0 (point) is now the last tile
        let last = PixelRect::from_position_size(positions[0], TILE);
        let tile = PixelGrid::copy_from(&dest, last).unwrap();
        assert!(tile.pixels().iter().all(|&v| v == role_value(Compact5Role::Point)));
    }

    #[test]
    fn test_invalid_margin_writes_nothing() {
        let (sheet, refs) = role_sheet(TILE);
        let layout = BlobLayout::new(Coord::ZERO, TILE);
        for margin in [Coord::new(0, 5), Coord::new(9, 5)] {
            let mut dest = PixelGrid::new(layout.pixel_size(), 0u8);
            let result = expand_compact5(&sheet, TILE, &refs, margin, &mut dest, AT_ORIGIN);
            assert!(matches!(result, Err(AutotileError::InvalidGeometry { .. })));
            assert!(dest.pixels().iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn test_destination_out_of_bounds_writes_nothing() {
        let (sheet, refs) = role_sheet(TILE);
        // One row short: cases 36..47 do not fit
        let mut dest = PixelGrid::new(Coord::new(TILE.x * 12, TILE.y * 3), 0u8);

        let result = expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, AT_ORIGIN);

        match result {
            Err(AutotileError::OutOfBounds { target, rect, .. }) => {
                assert_eq!(target, BlitTarget::Destination(36));
                assert_eq!(rect, PixelRect::new(0, 48, 16, 16));
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
        assert!(dest.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_reference_out_of_bounds() {
        let (sheet, mut refs) = role_sheet(TILE);
        refs.full = Coord::new(70, 0);
        let mut dest = PixelGrid::new(BlobLayout::new(Coord::ZERO, TILE).pixel_size(), 0u8);

        let result = expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, AT_ORIGIN);

        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Reference(Compact5Role::Full),
                ..
            })
        ));
        assert!(dest.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_huge_reference_position_writes_nothing() {
        let (sheet, mut refs) = role_sheet(TILE);
        refs.full = Coord::new(i32::MAX - 4, 0);
        let mut dest = PixelGrid::new(BlobLayout::new(Coord::ZERO, TILE).pixel_size(), 0u8);

        let result = expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, AT_ORIGIN);

        match result {
            Err(AutotileError::OutOfBounds { target, rect, bounds }) => {
                assert_eq!(target, BlitTarget::Reference(Compact5Role::Full));
                assert_eq!(rect, PixelRect::new(i32::MAX - 4, 0, 16, 16));
                assert_eq!(bounds, PixelRect::new(0, 0, 80, 16));
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
        assert!(dest.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_huge_explicit_position_writes_nothing() {
        let (sheet, refs) = role_sheet(TILE);
        let layout = BlobLayout::new(Coord::ZERO, TILE);
        let mut positions = layout.positions();
        positions[8] = Coord::new(i32::MAX - 4, 0);
        let mut dest = PixelGrid::new(layout.pixel_size(), 0u8);

        let targets = Destination::Positions(&positions);
        let result = expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, targets);

        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Destination(8),
                ..
            })
        ));
        assert!(dest.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_huge_layout_origin_writes_nothing() {
        let (sheet, refs) = role_sheet(TILE);
        let mut dest = PixelGrid::new(BlobLayout::new(Coord::ZERO, TILE).pixel_size(), 0u8);
        let targets = Destination::LayoutOrigin(Coord::new(i32::MAX - 100, 0));

        let result = expand_compact5(&sheet, TILE, &refs, MARGIN, &mut dest, targets);

        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Destination(0),
                ..
            })
        ));
        assert!(dest.pixels().iter().all(|&v| v == 0));

        // In place, the references are looked up in the same far-away layout
        let mut image = PixelGrid::new(Coord::new(192, 64), 3u8);
        let layout = BlobLayout::new(Coord::new(i32::MAX - 100, i32::MAX - 100), TILE);
        let result = generate_layout_in_place(&mut image, &layout, MARGIN);
        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Reference(Compact5Role::Point),
                ..
            })
        ));
        assert!(image.pixels().iter().all(|&v| v == 3));
    }

    #[test]
    fn test_copy_band_names_the_rejected_side() {
        let source = PixelGrid::new(TILE, 1u8);
        let mut dest = PixelGrid::new(TILE, 0u8);

        let result = copy_band(
            &source,
            Compact5Role::Cross,
            PixelRect::new(8, 8, 16, 16),
            &mut dest,
            46,
            Coord::ZERO,
        );
        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Reference(Compact5Role::Cross),
                ..
            })
        ));

        let result = copy_band(
            &source,
            Compact5Role::Point,
            PixelRect::new(0, 0, 16, 16),
            &mut dest,
            3,
            Coord::new(8, 0),
        );
        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Destination(3),
                ..
            })
        ));
        assert!(dest.pixels().iter().all(|&v| v == 0));

        copy_band(
            &source,
            Compact5Role::Point,
            PixelRect::new(0, 0, 8, 8),
            &mut dest,
            3,
            Coord::new(8, 8),
        )
        .unwrap();
        assert_eq!(dest.get(8, 8), Some(1));
        assert_eq!(dest.get(7, 7), Some(0));
    }

    #[test]
    fn test_in_place_matches_separate_source() {
        let layout = BlobLayout::new(Coord::new(16, 0), TILE);
        let mut rng = SmallRng::seed_from_u64(5);
        let size = layout.pixel_size() + Coord::new(16, 0);
        let mut image = PixelGrid::from_fn(size, |_, _| rng.gen_range(1..=255u8));
        let original = image.clone();

        generate_layout_in_place(&mut image, &layout, MARGIN).unwrap();

        // Reference slots keep their content
        for role in Compact5Role::ALL {
            let rect = layout.tile_rect(role.case_index());
            assert_eq!(
                PixelGrid::copy_from(&image, rect).unwrap(),
                PixelGrid::copy_from(&original, rect).unwrap()
            );
        }

        // Same result as reading the references from an untouched copy
        let mut expected = original.clone();
        expand_compact5(
            &original,
            TILE,
            &ReferencePositions::from_layout(&layout),
            MARGIN,
            &mut expected,
            Destination::LayoutOrigin(layout.origin),
        )
        .unwrap();
        assert_eq!(image, expected);

        // Column left of the layout is untouched
        let outside = PixelRect::new(0, 0, 16, size.y);
        assert_eq!(
            PixelGrid::copy_from(&image, outside).unwrap(),
            PixelGrid::copy_from(&original, outside).unwrap()
        );
    }

    #[test]
    fn test_in_place_rejects_bad_reference() {
        // Too small for the cross tile's slot in the last row
        let mut image = PixelGrid::new(Coord::new(64, 64), 3u8);
        let layout = BlobLayout::new(Coord::ZERO, TILE);
        let result = generate_layout_in_place(&mut image, &layout, MARGIN);
        assert!(matches!(
            result,
            Err(AutotileError::OutOfBounds {
                target: BlitTarget::Reference(Compact5Role::Cross),
                ..
            })
        ));
        assert!(image.pixels().iter().all(|&v| v == 3));
    }
}
