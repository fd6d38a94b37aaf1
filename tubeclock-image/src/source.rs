//! Random-access byte sources for the decoders

use crate::error::DecodeError;

/// Random-access reader over one encoded image
///
/// Decoders read the header first and then one row at a time, so only a
/// row's worth of bytes is ever buffered.
pub trait ImageSource {
    /// Fill `buffer` with the bytes starting at `offset`
    ///
    /// Fails with [`DecodeError::ResourceNotFound`] if the image does not
    /// exist and [`DecodeError::Truncated`] if it is too short.
    fn read_at(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), DecodeError>;
}

impl ImageSource for &[u8] {
    fn read_at(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), DecodeError> {
        let end = offset
            .checked_add(buffer.len())
            .ok_or(DecodeError::Truncated)?;
        let src = self.get(offset..end).ok_or(DecodeError::Truncated)?;
        buffer.copy_from_slice(src);
        Ok(())
    }
}

/// Little-endian field readers over an already-read header
pub(crate) fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

pub(crate) fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

pub(crate) fn le_i32(bytes: &[u8], at: usize) -> i32 {
    le_u32(bytes, at) as i32
}

/// Read a header-phase block, mapping a short read to a header fault
pub(crate) fn read_header<S: ImageSource + ?Sized>(
    source: &mut S,
    offset: usize,
    buffer: &mut [u8],
) -> Result<(), DecodeError> {
    source.read_at(offset, buffer).map_err(|e| match e {
        DecodeError::Truncated => DecodeError::MalformedHeader(crate::HeaderFault::Short),
        other => other,
    })
}
