//! `Surface` implementations for `image` buffers

use crate::geometry::Coord;
use crate::surface::{Surface, SurfaceMut};
use image::{ImageBuffer, Pixel};
use std::ops::{Deref, DerefMut};

impl<P, C> Surface for ImageBuffer<P, C>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]>,
{
    type Pixel = P;

    fn size(&self) -> Coord {
        let (width, height) = ImageBuffer::dimensions(self);
        Coord::new(width as i32, height as i32)
    }

    fn pixel_at(&self, x: u32, y: u32) -> P {
        *self.get_pixel(x, y)
    }
}

impl<P, C> SurfaceMut for ImageBuffer<P, C>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]> + DerefMut,
{
    fn set_pixel_at(&mut self, x: u32, y: u32, pixel: P) {
        self.put_pixel(x, y, pixel);
    }
}
