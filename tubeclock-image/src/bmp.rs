//! Windows bitmap subset decoder
//!
//! Supports uncompressed (BI_RGB) bitmaps with a BITMAPINFOHEADER or larger:
//! 24 bit BGR, and 1/4/8 bit palettised images. Rows are stored bottom-up,
//! each padded to a 4-byte boundary; sub-byte pixels are packed most
//! significant bits first.
//!
//! Header layout (little-endian):
//! - 0: magic "BM" (0x4D42)
//! - 10: pixel array offset (u32)
//! - 14: info header size (u32)
//! - 18: width (i32), 22: height (i32)
//! - 26: planes (u16, must be 1), 28: bit depth (u16)
//! - 30: compression (u32, must be 0)
//! - 46: palette entries used (u32, 0 = 2^depth)
//!
//! The palette (B, G, R, reserved per entry) starts at `14 + header size`.

use crate::color::{dim_blend, rgb565};
use crate::error::{DecodeError, HeaderFault};
use crate::framebuffer::{FrameBuffer, Placement};
use crate::source::{le_i32, le_u16, le_u32, read_header, ImageSource};
use crate::{ImageDecoder, MAX_ROW_BYTES};

/// "BM" read as a little-endian u16
pub const BMP_MAGIC: u16 = 0x4D42;

/// File header (14) + BITMAPINFOHEADER (40)
const HEADER_LEN: usize = 54;

/// Smallest info header we understand (BITMAPINFOHEADER)
const MIN_INFO_HEADER: u32 = 40;

/// Largest palette a bitmap may carry
pub const MAX_PALETTE: usize = 256;

/// Parsed and validated bitmap header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BmpHeader {
    /// Offset of the first pixel row
    pub pixel_offset: u32,
    /// Size of the info header
    pub header_size: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels (bottom-up storage)
    pub height: u32,
    /// Bits per pixel: 1, 4, 8 or 24
    pub bit_depth: u16,
    /// Palette entries (0 for 24 bit)
    pub palette_len: u16,
}

impl BmpHeader {
    /// Read and validate the header of `source`
    pub fn read<S: ImageSource + ?Sized>(source: &mut S) -> Result<Self, DecodeError> {
        let mut magic = [0u8; 2];
        read_header(source, 0, &mut magic)?;
        if le_u16(&magic, 0) != BMP_MAGIC {
            return Err(HeaderFault::BadMagic.into());
        }

        let mut h = [0u8; HEADER_LEN];
        read_header(source, 0, &mut h)?;

        let pixel_offset = le_u32(&h, 10);
        let header_size = le_u32(&h, 14);
        let width = le_i32(&h, 18);
        let height = le_i32(&h, 22);
        let planes = le_u16(&h, 26);
        let bit_depth = le_u16(&h, 28);
        let compression = le_u32(&h, 30);

        if header_size < MIN_INFO_HEADER {
            return Err(HeaderFault::UnsupportedHeader.into());
        }
        if planes != 1 {
            return Err(HeaderFault::BadPlaneCount.into());
        }
        if !matches!(bit_depth, 1 | 4 | 8 | 24) {
            return Err(HeaderFault::UnsupportedBitDepth.into());
        }
        if compression != 0 {
            return Err(HeaderFault::Compressed.into());
        }
        // Negative height would be a top-down bitmap; not produced by the face tools
        if width <= 0 || height <= 0 {
            return Err(DecodeError::Geometry);
        }

        let palette_len = if bit_depth <= 8 {
            let declared = le_u32(&h, 46);
            let len = if declared == 0 { 1u32 << bit_depth } else { declared };
            if len as usize > MAX_PALETTE {
                return Err(HeaderFault::BadPalette.into());
            }
            len as u16
        } else {
            0
        };

        Ok(Self {
            pixel_offset,
            header_size,
            width: width as u32,
            height: height as u32,
            bit_depth,
            palette_len,
        })
    }

    /// Bytes per stored row, including padding to 4 bytes
    pub fn row_stride(&self) -> usize {
        ((self.bit_depth as usize * self.width as usize + 31) >> 5) * 4
    }

    /// Offset of the palette
    pub fn palette_offset(&self) -> usize {
        14 + self.header_size as usize
    }

    /// Load the palette as packed 0x00RRGGBB entries
    ///
    /// Unused entries stay black, so out-of-range indices draw black.
    fn read_palette<S: ImageSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<[u32; MAX_PALETTE], DecodeError> {
        let mut palette = [0u32; MAX_PALETTE];
        if self.palette_len == 0 {
            return Ok(palette);
        }
        let mut raw = [0u8; MAX_PALETTE * 4];
        let raw = &mut raw[..self.palette_len as usize * 4];
        read_header(source, self.palette_offset(), raw)?;
        for (entry, bytes) in palette.iter_mut().zip(raw.chunks_exact(4)) {
            *entry = le_u32(bytes, 0);
        }
        Ok(palette)
    }
}

/// Bitmap decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct BmpDecoder;

impl ImageDecoder for BmpDecoder {
    fn decode<S, const W: usize, const H: usize>(
        &self,
        source: &mut S,
        dimming: u8,
        frame: &mut FrameBuffer<W, H>,
    ) -> Result<Placement, DecodeError>
    where
        S: ImageSource + ?Sized,
    {
        let header = BmpHeader::read(source)?;
        let placement =
            FrameBuffer::<W, H>::place_centered(header.width as usize, header.height as usize)?;

        let stride = header.row_stride();
        if stride > MAX_ROW_BYTES {
            return Err(DecodeError::Geometry);
        }
        let palette = header.read_palette(source)?;

        // Header accepted; from here on the buffer is ours
        frame.clear();

        let width = header.width as usize;
        let height = header.height as usize;
        let x0 = placement.x as usize;
        let mut line = [0u8; MAX_ROW_BYTES];
        let line = &mut line[..stride];

        for file_row in 0..height {
            let offset = header.pixel_offset as usize + file_row * stride;
            source
                .read_at(offset, line)
                .map_err(|_| DecodeError::Truncated)?;

            // Bottom-up: the first stored row is the last on screen
            let y = placement.y as usize + (height - 1 - file_row);
            let Some(dst) = frame.row_mut(y) else {
                return Err(DecodeError::Geometry);
            };

            for col in 0..width {
                let color = match header.bit_depth {
                    24 => {
                        let i = col * 3;
                        rgb565(line[i + 2], line[i + 1], line[i])
                    }
                    depth => palette_color(&palette, palette_index(line, col, depth)),
                };
                dst[x0 + col] = dim_blend(color, dimming);
            }
        }

        Ok(placement)
    }
}

/// Palette index of pixel `col` in a packed row
#[inline]
fn palette_index(line: &[u8], col: usize, depth: u16) -> usize {
    match depth {
        8 => line[col] as usize,
        4 => {
            let byte = line[col / 2];
            if col & 1 == 0 {
                (byte >> 4) as usize
            } else {
                (byte & 0x0F) as usize
            }
        }
        _ => ((line[col / 8] >> (7 - (col & 7))) & 1) as usize,
    }
}

#[inline]
fn palette_color(palette: &[u32; MAX_PALETTE], index: usize) -> u16 {
    let c = palette[index];
    rgb565((c >> 16) as u8, (c >> 8) as u8, c as u8)
}
