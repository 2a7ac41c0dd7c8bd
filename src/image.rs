//! Raster access
//!
//! The scanner only ever reads luminance values. Anything that can report its
//! size and a gray level per pixel can be scanned by implementing [`Raster`].

use crate::{Error, Result};

/// Read-only, pixel-addressable grayscale raster
pub trait Raster {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Luminance of the pixel at `(x, y)`, 0 being black and 255 white
    ///
    /// Callers only pass in-range coordinates.
    fn luminance(&self, x: u32, y: u32) -> u8;
}

impl<R: Raster + ?Sized> Raster for &R {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn luminance(&self, x: u32, y: u32) -> u8 {
        (**self).luminance(x, y)
    }
}

/// A borrowed 8-bit grayscale image
#[derive(Debug, Clone, Copy)]
pub struct Image<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> Image<'a> {
    /// Create an image from row-major grayscale data
    pub fn from_gray(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage);
        }
        if (data.len() as u64) != (width as u64) * (height as u64) {
            return Err(Error::InvalidDimensions {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Image {
            data,
            width,
            height,
        })
    }

    /// Get access to the raw image data
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl Raster for Image<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn luminance(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(feature = "image")]
impl Raster for image::GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn luminance(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[0]
    }
}
