//! Connectivity mask <-> blob case resolution
//!
//! A connectivity mask records which of the 8 neighbors of a cell are the same
//! kind of tile. Bits follow the row-major order of the 3x3 neighborhood with
//! the centre skipped:
//!
//! ```text
//! 0 1 2      NW N  NE
//! 3 x 4  ->  W  x  E
//! 5 6 7      SW S  SE
//! ```
//!
//! Every one of the 256 masks resolves to one of the 47 blob cases. Diagonal
//! bits only matter when both adjacent orthogonal bits are set, so masks that
//! differ only in such "floating" diagonals share a case.

use crate::AutotileError;

/// Number of distinct blob cases
pub const CASE_COUNT: usize = 47;

/// Neighbor direction flags for mask construction
pub mod neighbors {
    pub const NW: u8 = 0b0000_0001; // Northwest (corner)
    pub const N: u8 = 0b0000_0010; // North
    pub const NE: u8 = 0b0000_0100; // Northeast (corner)
    pub const W: u8 = 0b0000_1000; // West
    pub const E: u8 = 0b0001_0000; // East
    pub const SW: u8 = 0b0010_0000; // Southwest (corner)
    pub const S: u8 = 0b0100_0000; // South
    pub const SE: u8 = 0b1000_0000; // Southeast (corner)

    /// All 8 flags in bit order, with their grid offset (y grows downwards)
    pub const OFFSETS: [(u8, i32, i32); 8] = [
        (NW, -1, -1),
        (N, 0, -1),
        (NE, 1, -1),
        (W, -1, 0),
        (E, 1, 0),
        (SW, -1, 1),
        (S, 0, 1),
        (SE, 1, 1),
    ];

    /// Each diagonal flag with the two sides it needs to be reachable
    pub const DIAGONALS: [(u8, u8); 4] = [(NW, N | W), (NE, N | E), (SW, S | W), (SE, S | E)];

    pub const ORTHOGONAL: u8 = N | W | E | S;
    pub const ALL: u8 = 0xff;
}

#[rustfmt::skip]
static MASK_TO_CASE: [u8; 256] = [
     0,  0, 36, 36,  0,  0, 36, 36,  3,  3, 17, 39,  3,  3, 17, 39,
     1,  1, 16, 16,  1,  1, 37, 37,  2,  2, 18, 42,  2,  2, 40, 38,
     0,  0, 36, 36,  0,  0, 36, 36,  3,  3, 17, 39,  3,  3, 17, 39,
     1,  1, 16, 16,  1,  1, 37, 37,  2,  2, 18, 42,  2,  2, 40, 38,
    12, 12, 24, 24, 12, 12, 24, 24,  5,  5, 19, 41,  5,  5, 19, 41,
     4,  4,  6,  6,  4,  4, 30, 30,  7,  7, 46, 20,  7,  7,  8, 11,
    12, 12, 24, 24, 12, 12, 24, 24, 15, 15, 43, 27, 15, 15, 43, 27,
     4,  4,  6,  6,  4,  4, 30, 30, 29, 29, 21, 10, 29, 29, 34, 32,
     0,  0, 36, 36,  0,  0, 36, 36,  3,  3, 17, 39,  3,  3, 17, 39,
     1,  1, 16, 16,  1,  1, 37, 37,  2,  2, 18, 42,  2,  2, 40, 38,
     0,  0, 36, 36,  0,  0, 36, 36,  3,  3, 17, 39,  3,  3, 17, 39,
     1,  1, 16, 16,  1,  1, 37, 37,  2,  2, 18, 42,  2,  2, 40, 38,
    12, 12, 24, 24, 12, 12, 24, 24,  5,  5, 19, 41,  5,  5, 19, 41,
    13, 13, 28, 28, 13, 13, 25, 25, 31, 31,  9, 35, 31, 31, 23, 33,
    12, 12, 24, 24, 12, 12, 24, 24, 15, 15, 43, 27, 15, 15, 43, 27,
    13, 13, 28, 28, 13, 13, 25, 25, 14, 14, 22, 44, 14, 14, 45, 26,
];

static CASE_TO_MASK: [u8; CASE_COUNT] = {
    use neighbors::*;
    [
        0,                            // 0
        E,                            // 1
        W | E,                        // 2
        W,                            // 3
        E | S,                        // 4
        W | S,                        // 5
        N | E | S,                    // 6
        W | E | S,                    // 7
        N | NE | W | E | S,           // 8
        N | W | E | S | SE,           // 9
        NW | N | W | E | SW | S,      // 10
        NW | N | NE | W | E | S,      // 11
        S,                            // 12
        E | S | SE,                   // 13
        W | E | SW | S | SE,          // 14
        W | SW | S,                   // 15
        N | E,                        // 16
        N | W,                        // 17
        N | W | E,                    // 18
        N | W | S,                    // 19
        NW | N | W | E | S,           // 20
        N | W | E | SW | S,           // 21
        N | W | E | SW | S | SE,      // 22
        N | NE | W | E | S | SE,      // 23
        N | S,                        // 24
        N | NE | E | S | SE,          // 25
        ALL,                          // 26
        NW | N | W | SW | S,          // 27
        N | E | S | SE,               // 28
        W | E | SW | S,               // 29
        N | NE | E | S,               // 30
        W | E | S | SE,               // 31
        NW | N | NE | W | E | SW | S, // 32
        NW | N | NE | W | E | S | SE, // 33
        N | NE | W | E | SW | S,      // 34
        NW | N | W | E | S | SE,      // 35
        N,                            // 36
        N | NE | E,                   // 37
        NW | N | NE | W | E,          // 38
        NW | N | W,                   // 39
        N | NE | W | E,               // 40
        NW | N | W | S,               // 41
        NW | N | W | E,               // 42
        N | W | SW | S,               // 43
        NW | N | W | E | SW | S | SE, // 44
        N | NE | W | E | SW | S | SE, // 45
        N | W | E | S,                // 46
    ]
};

/// Resolve any connectivity mask to its blob case index in `0..47`
#[inline]
pub fn case_index_from_mask(mask: u8) -> u8 {
    MASK_TO_CASE[mask as usize]
}

/// Canonical connectivity mask for a case index
///
/// The returned mask never contains a diagonal bit without both of its
/// adjacent orthogonal bits.
#[inline]
pub fn mask_from_case_index(case_index: u8) -> Result<u8, AutotileError> {
    CASE_TO_MASK
        .get(case_index as usize)
        .copied()
        .ok_or(AutotileError::CaseOutOfRange(case_index))
}

/// Clear diagonal bits that are not backed by both adjacent orthogonal bits
///
/// Does not change which case a mask resolves to.
pub fn normalize_mask(mask: u8) -> u8 {
    neighbors::DIAGONALS
        .iter()
        .filter(|(_, sides)| mask & sides != *sides)
        .fold(mask, |result, (corner, _)| result & !corner)
}

/// Build the connectivity mask of cell `(x, y)` by probing its 8 neighbors
///
/// `is_connected` is called with neighbor coordinates; y grows downwards, so
/// north is `(x, y - 1)`. The raw mask is returned, floating diagonals included.
pub fn calculate_mask<F>(x: i32, y: i32, is_connected: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    neighbors::OFFSETS
        .iter()
        .filter(|(_, dx, dy)| is_connected(x + dx, y + dy))
        .fold(0u8, |mask, (bit, _, _)| mask | bit)
}
