//! Packed RGB565 decoder
//!
//! `.clk` files are produced offline from bitmaps so the clock can skip
//! palette lookups and row flipping. Pixels are stored top-down, one
//! little-endian `u16` each, with no row padding.

use crate::color::dim_scale;
use crate::error::{DecodeError, HeaderFault};
use crate::framebuffer::{FrameBuffer, Placement};
use crate::source::{le_u16, read_header, ImageSource};
use crate::{ImageDecoder, MAX_ROW_BYTES};

/// "CK" read as a little-endian u16
pub const CLK_MAGIC: u16 = 0x4B43;

/// Magic + width + height
pub const HEADER_LEN: usize = 6;

/// Build a `.clk` header for a `width` × `height` image
pub const fn header(width: u16, height: u16) -> [u8; HEADER_LEN] {
    let m = CLK_MAGIC.to_le_bytes();
    let w = width.to_le_bytes();
    let h = height.to_le_bytes();
    [m[0], m[1], w[0], w[1], h[0], h[1]]
}

/// Packed image decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct ClkDecoder;

impl ImageDecoder for ClkDecoder {
    fn decode<S, const W: usize, const H: usize>(
        &self,
        source: &mut S,
        dimming: u8,
        frame: &mut FrameBuffer<W, H>,
    ) -> Result<Placement, DecodeError>
    where
        S: ImageSource + ?Sized,
    {
        let mut h = [0u8; HEADER_LEN];
        read_header(source, 0, &mut h)?;
        if le_u16(&h, 0) != CLK_MAGIC {
            return Err(HeaderFault::BadMagic.into());
        }
        let width = le_u16(&h, 2) as usize;
        let height = le_u16(&h, 4) as usize;

        let placement = FrameBuffer::<W, H>::place_centered(width, height)?;
        let stride = width * 2;
        if stride > MAX_ROW_BYTES {
            return Err(DecodeError::Geometry);
        }

        frame.clear();

        let x0 = placement.x as usize;
        let mut line = [0u8; MAX_ROW_BYTES];
        let line = &mut line[..stride];

        for row in 0..height {
            source
                .read_at(HEADER_LEN + row * stride, line)
                .map_err(|_| DecodeError::Truncated)?;

            let Some(dst) = frame.row_mut(placement.y as usize + row) else {
                return Err(DecodeError::Geometry);
            };
            for (px, bytes) in dst[x0..x0 + width].iter_mut().zip(line.chunks_exact(2)) {
                *px = dim_scale(le_u16(bytes, 0), dimming);
            }
        }

        Ok(placement)
    }
}
