//! Image storage abstractions
//!
//! Clock face images live in a read-only store (a flash file system on the
//! existing clock boards) and are addressed by name, e.g. `"17.bmp"`. The codec
//! reads them in row-sized pieces, so the store exposes random access rather
//! than whole-file loads.

/// Errors from image storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No resource with that name
    NotFound,
    /// Read starts or ends past the end of the resource
    OutOfRange,
    /// Underlying medium failed
    Io,
}

/// Read-only named resource store
///
/// Implementations are blocking: a read returns once the bytes are in the
/// caller's buffer.
pub trait ImageStore {
    /// Size of the named resource in bytes
    ///
    /// Returns `None` if the resource does not exist.
    fn size(&mut self, name: &str) -> Option<usize>;

    /// Read `buffer.len()` bytes starting at `offset`
    ///
    /// # Arguments
    /// * `name` - Resource name
    /// * `offset` - Byte offset from the start of the resource
    /// * `buffer` - Destination; filled completely on success
    fn read_at(&mut self, name: &str, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Check if a resource exists
    fn exists(&mut self, name: &str) -> bool {
        self.size(name).is_some()
    }
}

impl<S: ImageStore + ?Sized> ImageStore for &mut S {
    fn size(&mut self, name: &str) -> Option<usize> {
        (**self).size(name)
    }

    fn read_at(&mut self, name: &str, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        (**self).read_at(name, offset, buffer)
    }
}

/// Store backed by a static table of `(name, bytes)` pairs
///
/// Useful for images linked into the firmware image and for host tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticImageStore<'a> {
    entries: &'a [(&'a str, &'a [u8])],
}

impl<'a> StaticImageStore<'a> {
    /// Create a store over a name/bytes table
    pub const fn new(entries: &'a [(&'a str, &'a [u8])]) -> Self {
        Self { entries }
    }

    fn find(&self, name: &str) -> Option<&'a [u8]> {
        let name = name.trim_start_matches('/');
        self.entries
            .iter()
            .find(|(entry, _)| entry.trim_start_matches('/') == name)
            .map(|(_, bytes)| *bytes)
    }
}

impl ImageStore for StaticImageStore<'_> {
    fn size(&mut self, name: &str) -> Option<usize> {
        self.find(name).map(<[u8]>::len)
    }

    fn read_at(&mut self, name: &str, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        let bytes = self.find(name).ok_or(StorageError::NotFound)?;
        let end = offset
            .checked_add(buffer.len())
            .ok_or(StorageError::OutOfRange)?;
        let src = bytes.get(offset..end).ok_or(StorageError::OutOfRange)?;
        buffer.copy_from_slice(src);
        Ok(())
    }
}
