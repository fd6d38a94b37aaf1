//! Single RGB565 frame buffer
//!
//! One buffer the size of a panel, reused for every decode. Pixels are kept
//! in native `u16` form; the panel driver swaps to wire order on transfer.

use crate::color::BLACK;
use crate::error::DecodeError;

/// Where a decoded image sits inside the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Placement {
    /// Left column of the image
    pub x: u16,
    /// Top row of the image
    pub y: u16,
    /// Image width in pixels
    pub width: u16,
    /// Image height in pixels
    pub height: u16,
}

impl Placement {
    /// Check if a buffer coordinate lies inside the image
    pub fn contains(&self, x: usize, y: usize) -> bool {
        let (x0, y0) = (self.x as usize, self.y as usize);
        x >= x0 && x < x0 + self.width as usize && y >= y0 && y < y0 + self.height as usize
    }
}

/// Fixed-size RGB565 pixel buffer, `W` columns by `H` rows
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer<const W: usize, const H: usize> {
    pixels: [[u16; W]; H],
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    /// Buffer width in pixels
    pub const WIDTH: usize = W;

    /// Buffer height in pixels
    pub const HEIGHT: usize = H;

    /// Create a black buffer
    pub const fn new() -> Self {
        Self {
            pixels: [[BLACK; W]; H],
        }
    }

    /// Fill the whole buffer with black
    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    /// Fill the whole buffer with one colour
    pub fn fill(&mut self, color: u16) {
        for row in self.pixels.iter_mut() {
            row.fill(color);
        }
    }

    /// Read one pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Write one pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u16) {
        if let Some(p) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *p = color;
        }
    }

    /// Borrow one row
    pub fn row(&self, y: usize) -> Option<&[u16; W]> {
        self.pixels.get(y)
    }

    /// Mutably borrow one row
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u16; W]> {
        self.pixels.get_mut(y)
    }

    /// All pixels, row-major
    pub fn as_slice(&self) -> &[u16] {
        self.pixels.as_flattened()
    }

    /// Centre a `width` × `height` image in the buffer
    ///
    /// Zero-sized images and images larger than the buffer are rejected.
    pub fn place_centered(width: usize, height: usize) -> Result<Placement, DecodeError> {
        if width == 0 || height == 0 || width > W || height > H {
            return Err(DecodeError::Geometry);
        }
        Ok(Placement {
            x: ((W - width) / 2) as u16,
            y: ((H - height) / 2) as u16,
            width: width as u16,
            height: height as u16,
        })
    }
}
