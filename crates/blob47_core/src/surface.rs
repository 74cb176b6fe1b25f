//! Raster surface abstraction
//!
//! The atlas expander only needs to read pixels from one surface and copy
//! rectangles of them into another. These traits capture that contract so the
//! expander stays independent of any particular image library.

use crate::geometry::{Coord, PixelRect};
use crate::SurfaceError;

/// A readable raster surface
pub trait Surface {
    type Pixel: Copy;

    /// Width and height in pixels
    fn size(&self) -> Coord;

    /// Read one pixel. Callers guarantee `(x, y)` is inside `size()`.
    fn pixel_at(&self, x: u32, y: u32) -> Self::Pixel;

    /// Rectangle covering the whole surface
    fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.size())
    }

    /// Fail with `OutOfBounds` unless `rect` lies fully inside the surface
    fn check_rect(&self, rect: PixelRect) -> Result<(), SurfaceError> {
        let bounds = self.bounds();
        if bounds.encloses(&rect) {
            Ok(())
        } else {
            Err(SurfaceError::OutOfBounds { rect, bounds })
        }
    }
}

/// A raster surface that can be written to
pub trait SurfaceMut: Surface {
    /// Write one pixel. Callers guarantee `(x, y)` is inside `size()`.
    fn set_pixel_at(&mut self, x: u32, y: u32, pixel: Self::Pixel);

    /// Copy `src_rect` of `source` so that its top-left lands on `dst_position`.
    ///
    /// Both rectangles are bounds-checked before any pixel is written; nothing
    /// is clipped. Empty rectangles are a no-op.
    fn blit_rect<S>(
        &mut self,
        source: &S,
        src_rect: PixelRect,
        dst_position: Coord,
    ) -> Result<(), SurfaceError>
    where
        S: Surface<Pixel = Self::Pixel> + ?Sized,
    {
        if src_rect.is_empty() {
            return Ok(());
        }
        let dst_rect = PixelRect::from_position_size(dst_position, src_rect.size);
        source.check_rect(src_rect)?;
        self.check_rect(dst_rect)?;

        for dy in 0..src_rect.size.y {
            let sy = (src_rect.position.y + dy) as u32;
            let ty = (dst_position.y + dy) as u32;
            for dx in 0..src_rect.size.x {
                let sx = (src_rect.position.x + dx) as u32;
                let tx = (dst_position.x + dx) as u32;
                self.set_pixel_at(tx, ty, source.pixel_at(sx, sy));
            }
        }
        Ok(())
    }

    /// Fill `rect` with a single pixel value
    fn fill_rect(&mut self, rect: PixelRect, pixel: Self::Pixel) -> Result<(), SurfaceError> {
        if rect.is_empty() {
            return Ok(());
        }
        self.check_rect(rect)?;
        for y in rect.position.y..rect.end().y {
            for x in rect.position.x..rect.end().x {
                self.set_pixel_at(x as u32, y as u32, pixel);
            }
        }
        Ok(())
    }
}

/// Owned row-major pixel buffer
///
/// Mostly used as scratch space: a region of another surface can be
/// snapshotted with [`PixelGrid::copy_from`] so it can be read while the
/// original surface is being written.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

impl<P: Copy> PixelGrid<P> {
    /// Create a grid of `size` filled with `fill`. Negative sizes clamp to zero.
    pub fn new(size: Coord, fill: P) -> Self {
        let width = size.x.max(0) as u32;
        let height = size.y.max(0) as u32;
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Create a grid by evaluating `f(x, y)` for every pixel
    pub fn from_fn(size: Coord, mut f: impl FnMut(u32, u32) -> P) -> Self {
        let width = size.x.max(0) as u32;
        let height = size.y.max(0) as u32;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Snapshot `rect` of `source` into a new grid
    pub fn copy_from<S>(source: &S, rect: PixelRect) -> Result<Self, SurfaceError>
    where
        S: Surface<Pixel = P> + ?Sized,
    {
        source.check_rect(rect)?;
        let origin = rect.position;
        Ok(Self::from_fn(rect.size, |x, y| {
            source.pixel_at(origin.x as u32 + x, origin.y as u32 + y)
        }))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<P> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl<P: Copy> Surface for PixelGrid<P> {
    type Pixel = P;

    fn size(&self) -> Coord {
        Coord::new(self.width as i32, self.height as i32)
    }

    fn pixel_at(&self, x: u32, y: u32) -> P {
        self.pixels[self.index(x, y)]
    }
}

impl<P: Copy> SurfaceMut for PixelGrid<P> {
    fn set_pixel_at(&mut self, x: u32, y: u32, pixel: P) {
        let i = self.index(x, y);
        self.pixels[i] = pixel;
    }
}
