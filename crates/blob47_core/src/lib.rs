//! Core types for blob47 atlas generation
//!
//! This crate provides the small vocabulary shared by the autotile crates:
//! - `Coord` - An integer pixel position or size
//! - `PixelRect` - An axis-aligned pixel rectangle
//! - `Surface` / `SurfaceMut` - Readable and writable raster surfaces
//! - `PixelGrid` - An owned surface used as scratch space
//!
//! With the `image` feature (on by default) the surface traits are
//! implemented for `image::ImageBuffer`, so any `RgbaImage` can be used as a
//! source or destination directly.

mod geometry;
mod surface;

#[cfg(feature = "image")]
mod image_surface;

pub use geometry::{Coord, PixelRect};
pub use surface::{PixelGrid, Surface, SurfaceMut};

use thiserror::Error;

/// Errors raised by surface operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("rect {rect} is outside surface bounds {bounds}")]
    OutOfBounds { rect: PixelRect, bounds: PixelRect },
}
