//! Decode errors
//!
//! None of these are fatal: the caller keeps whatever was on the panel and
//! tries again on a later tick.

/// What was wrong with a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderFault {
    /// Magic number did not match the configured format
    BadMagic,
    /// Resource ended inside the header or palette
    Short,
    /// Info header older or smaller than BITMAPINFOHEADER
    UnsupportedHeader,
    /// Bit depth other than 1, 4, 8 or 24
    UnsupportedBitDepth,
    /// Compression field was not 0 (BI_RGB)
    Compressed,
    /// Colour plane count was not 1
    BadPlaneCount,
    /// Palette declared more than 256 entries
    BadPalette,
}

/// Image decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// No resource for this file index
    ResourceNotFound,
    /// Header rejected; the frame buffer was not touched
    MalformedHeader(HeaderFault),
    /// Width/height zero, negative, or larger than the frame buffer
    Geometry,
    /// Pixel data ended early; the frame buffer holds a partial image
    Truncated,
}

impl DecodeError {
    /// Whether the frame buffer may have been modified before the error
    pub const fn touched_frame(&self) -> bool {
        matches!(self, DecodeError::Truncated)
    }
}

impl From<HeaderFault> for DecodeError {
    fn from(fault: HeaderFault) -> Self {
        DecodeError::MalformedHeader(fault)
    }
}
