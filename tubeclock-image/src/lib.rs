//! Clock face image codecs
//!
//! Every digit image is decoded into one fixed-size RGB565 [`FrameBuffer`]
//! the size of a panel. Two on-flash encodings are supported, selected by
//! [`ImageFormat`]:
//!
//! - **Bitmap** (`.bmp`): uncompressed Windows bitmaps, 1/4/8 bit
//!   palettised or 24 bit BGR, rows stored bottom-up and 4-byte aligned.
//! - **Packed** (`.clk`): a 6 byte header followed by top-down rows of
//!   little-endian RGB565 pixels, ready to push.
//!
//! ```text
//! .clk layout
//! ┌───────┬───────┬────────┬──────────────────────────┐
//! │ "CK"  │ WIDTH │ HEIGHT │ PIXELS (W×H × u16 LE)    │
//! │ 2B    │ 2B LE │ 2B LE  │ row 0 first              │
//! └───────┴───────┴────────┴──────────────────────────┘
//! ```
//!
//! Images smaller than the buffer are centred on a black background.
//! Night dimming is folded into the decode so the frame buffer always holds
//! exactly what goes over the wire.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bmp;
pub mod clk;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod source;

pub use bmp::BmpDecoder;
pub use clk::ClkDecoder;
pub use color::{rgb565, BLACK, FULL_BRIGHTNESS};
pub use error::{DecodeError, HeaderFault};
pub use framebuffer::{FrameBuffer, Placement};
pub use source::ImageSource;

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest resource name: "255.bmp"
pub const MAX_FILE_NAME_LEN: usize = 8;

/// Largest encoded row the decoders will buffer
///
/// Enough for a 24 bit bitmap 680 pixels wide.
pub const MAX_ROW_BYTES: usize = 2048;

/// Common decoder interface
///
/// Implementations validate the whole header before touching `frame`, so a
/// header-level error leaves the buffer as it was.
pub trait ImageDecoder {
    /// Decode `source` into `frame`, dimmed by `dimming` (255 = unmodified)
    ///
    /// Returns where in the buffer the image landed.
    fn decode<S, const W: usize, const H: usize>(
        &self,
        source: &mut S,
        dimming: u8,
        frame: &mut FrameBuffer<W, H>,
    ) -> Result<Placement, DecodeError>
    where
        S: ImageSource + ?Sized;
}

/// On-flash image encoding
///
/// Exactly one format is active for a build; the whole face set uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageFormat {
    /// Windows bitmap subset, `.bmp`
    #[default]
    Bitmap,
    /// Pre-packed RGB565, `.clk`
    Packed,
}

impl ImageFormat {
    /// File extension without the dot
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bitmap => "bmp",
            ImageFormat::Packed => "clk",
        }
    }

    /// Resource name for a file index, e.g. `"17.clk"`
    pub fn file_name(self, file_index: u8) -> String<MAX_FILE_NAME_LEN> {
        let mut name = String::new();
        // "255.bmp" is 7 bytes, the write cannot overflow
        let _ = write!(name, "{}.{}", file_index, self.extension());
        name
    }

    /// Decode with the codec for this format
    pub fn decode<S, const W: usize, const H: usize>(
        self,
        source: &mut S,
        dimming: u8,
        frame: &mut FrameBuffer<W, H>,
    ) -> Result<Placement, DecodeError>
    where
        S: ImageSource + ?Sized,
    {
        match self {
            ImageFormat::Bitmap => BmpDecoder.decode(source, dimming, frame),
            ImageFormat::Packed => ClkDecoder.decode(source, dimming, frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ImageFormat::Bitmap.file_name(0).as_str(), "0.bmp");
        assert_eq!(ImageFormat::Bitmap.file_name(17).as_str(), "17.bmp");
        assert_eq!(ImageFormat::Packed.file_name(255).as_str(), "255.clk");
    }

    #[test]
    fn test_dispatch_by_format() {
        let mut frame: FrameBuffer<4, 4> = FrameBuffer::new();
        let bytes = clk::header(2, 2)
            .into_iter()
            .chain([0xFFu8; 8])
            .collect::<std::vec::Vec<u8>>();

        let mut src: &[u8] = &bytes;
        let placed = ImageFormat::Packed.decode(&mut src, 255, &mut frame).unwrap();
        assert_eq!(placed, Placement { x: 1, y: 1, width: 2, height: 2 });

        // The same bytes are not a bitmap
        let mut src: &[u8] = &bytes;
        assert_eq!(
            ImageFormat::Bitmap.decode(&mut src, 255, &mut frame),
            Err(DecodeError::MalformedHeader(HeaderFault::BadMagic))
        );
    }
}
