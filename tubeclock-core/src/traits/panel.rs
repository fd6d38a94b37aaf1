//! TFT panel trait

use tubeclock_image::FrameBuffer;

/// Errors that can occur while writing to a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// SPI write failed
    Bus,
    /// Area outside the panel, or pixel count does not match the area
    OutOfBounds,
}

/// Rectangle in panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if the area lies within a `width` x `height` panel
    pub const fn fits(&self, width: u16, height: u16) -> bool {
        self.x as u32 + self.width as u32 <= width as u32
            && self.y as u32 + self.height as u32 <= height as u32
    }
}

/// One TFT panel on the shared bus
///
/// Methods write to whichever panels the chip select currently enables;
/// the panel itself has no notion of being selected.
pub trait Panel {
    /// Run the controller init sequence
    fn init(&mut self) -> Result<(), TransferError>;

    /// Visible width in pixels
    fn width(&self) -> u16;

    /// Visible height in pixels
    fn height(&self) -> u16;

    /// Write `pixels` (row-major RGB565) into `area`
    ///
    /// `pixels.len()` must equal `area.pixel_count()`.
    fn write_pixels(&mut self, area: Area, pixels: &[u16]) -> Result<(), TransferError>;

    /// Fill `area` with one colour
    fn fill(&mut self, area: Area, color: u16) -> Result<(), TransferError>;

    /// Whole visible area
    fn bounds(&self) -> Area {
        Area::new(0, 0, self.width(), self.height())
    }

    /// Fill the whole panel with one colour
    fn fill_screen(&mut self, color: u16) -> Result<(), TransferError> {
        let area = self.bounds();
        self.fill(area, color)
    }

    /// Push a full frame buffer, anchored at the top-left corner
    fn write_frame<const W: usize, const H: usize>(
        &mut self,
        frame: &FrameBuffer<W, H>,
    ) -> Result<(), TransferError>
    where
        Self: Sized,
    {
        let area = Area::new(0, 0, W as u16, H as u16);
        self.write_pixels(area, frame.as_slice())
    }
}
