//! Integer pixel geometry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Integer 2D vector used for pixel positions, pixel sizes and grid coordinates
///
/// Serializes as a two-element array (`[x, y]`) so settings files stay terse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Same value on both axes
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v }
    }

    /// Component-wise minimum
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise sum, clamped to the `i32` range
    pub fn saturating_add(self, other: Self) -> Self {
        Self::new(self.x.saturating_add(other.x), self.y.saturating_add(other.y))
    }

    /// Component-wise product, clamped to the `i32` range
    pub fn saturating_mul(self, other: Self) -> Self {
        Self::new(self.x.saturating_mul(other.x), self.y.saturating_mul(other.y))
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for [i32; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for (i32, i32) {
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

impl Add for Coord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product, e.g. grid coordinates times tile resolution
impl Mul for Coord {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<i32> for Coord {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<i32> for Coord {
    type Output = Self;
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned pixel rectangle, half-open on its far edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub position: Coord,
    pub size: Coord,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: Coord::new(x, y),
            size: Coord::new(width, height),
        }
    }

    pub const fn from_position_size(position: Coord, size: Coord) -> Self {
        Self { position, size }
    }

    /// Rectangle covering `size` starting at the origin
    pub const fn from_size(size: Coord) -> Self {
        Self {
            position: Coord::ZERO,
            size,
        }
    }

    /// Exclusive far corner, clamped to the `i32` range
    pub fn end(&self) -> Coord {
        self.position.saturating_add(self.size)
    }

    /// `[x0, y0, x1, y1]` widened so far edges past `i32::MAX` stay exact
    fn extent(&self) -> [i64; 4] {
        let x = self.position.x as i64;
        let y = self.position.y as i64;
        [x, y, x + self.size.x as i64, y + self.size.y as i64]
    }

    /// True when the rectangle covers no pixel
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Smallest rectangle containing both `self` and `other`
    pub fn merge(&self, other: &PixelRect) -> PixelRect {
        let start = self.position.min(other.position);
        let end = self.end().max(other.end());
        PixelRect::from_position_size(start, end - start)
    }

    /// Same rectangle moved by `offset`, clamped to the `i32` range
    pub fn offset(&self, offset: Coord) -> PixelRect {
        PixelRect::from_position_size(self.position.saturating_add(offset), self.size)
    }

    /// True when every pixel of `other` lies inside `self`
    pub fn encloses(&self, other: &PixelRect) -> bool {
        let [x0, y0, x1, y1] = self.extent();
        let [ox0, oy0, ox1, oy1] = other.extent();
        ox0 >= x0 && oy0 >= y0 && ox1 <= x1 && oy1 <= y1
    }

    /// True when the two rectangles share at least one pixel
    pub fn intersects(&self, other: &PixelRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let [x0, y0, x1, y1] = self.extent();
        let [ox0, oy0, ox1, oy1] = other.extent();
        x0 < ox1 && ox0 < x1 && y0 < oy1 && oy0 < y1
    }

    pub fn contains(&self, point: Coord) -> bool {
        let [x0, y0, x1, y1] = self.extent();
        let (x, y) = (point.x as i64, point.y as i64);
        x >= x0 && y >= y0 && x < x1 && y < y1
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}x{}]",
            self.position.x, self.position.y, self.size.x, self.size.y
        )
    }
}
