//! Single-buffer frame cache
//!
//! There is exactly one frame buffer. The cache remembers which file index,
//! decoded under which dimming factor, it currently holds, and which file
//! index should be decoded next during idle time.

use tubeclock_core::{DigitValue, FaceSet, FileIndex};
use tubeclock_hal::{ImageStore, StorageError};
use tubeclock_image::{DecodeError, FrameBuffer, ImageFormat, ImageSource};

/// Image currently held by the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resident {
    file: FileIndex,
    dimming: u8,
}

/// Map a storage failure onto the codec's error taxonomy
pub fn storage_to_decode(error: StorageError) -> DecodeError {
    match error {
        StorageError::NotFound => DecodeError::ResourceNotFound,
        StorageError::OutOfRange | StorageError::Io => DecodeError::Truncated,
    }
}

/// One named resource in an [`ImageStore`], readable by the decoders
pub struct StoreSource<'a, S: ?Sized> {
    store: &'a mut S,
    name: &'a str,
}

impl<'a, S: ImageStore + ?Sized> StoreSource<'a, S> {
    pub fn new(store: &'a mut S, name: &'a str) -> Self {
        Self { store, name }
    }
}

impl<S: ImageStore + ?Sized> ImageSource for StoreSource<'_, S> {
    fn read_at(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), DecodeError> {
        self.store
            .read_at(self.name, offset, buffer)
            .map_err(storage_to_decode)
    }
}

/// The frame buffer plus its cache state
pub struct FrameCache<const W: usize, const H: usize> {
    frame: FrameBuffer<W, H>,
    format: ImageFormat,
    resident: Option<Resident>,
    prefetch_target: Option<FileIndex>,
    decodes: u32,
}

impl<const W: usize, const H: usize> FrameCache<W, H> {
    /// Create an empty cache decoding `format` images
    pub const fn new(format: ImageFormat) -> Self {
        Self {
            frame: FrameBuffer::new(),
            format,
            resident: None,
            prefetch_target: None,
            decodes: 0,
        }
    }

    /// Image encoding in use
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// The shared frame buffer
    pub fn frame(&self) -> &FrameBuffer<W, H> {
        &self.frame
    }

    /// File index currently decoded into the buffer
    pub fn resident(&self) -> Option<FileIndex> {
        self.resident.map(|r| r.file)
    }

    /// Check if `file` decoded under `dimming` is in the buffer
    pub fn is_resident(&self, file: FileIndex, dimming: u8) -> bool {
        self.resident == Some(Resident { file, dimming })
    }

    /// Number of decodes performed since creation
    pub fn decode_count(&self) -> u32 {
        self.decodes
    }

    /// Make `file` resident, decoding it from `store` if needed
    ///
    /// Returns whether a decode happened. On failure the resident tag is
    /// kept unless the decoder had already started writing pixels.
    pub fn ensure_resident<S: ImageStore + ?Sized>(
        &mut self,
        store: &mut S,
        file: FileIndex,
        dimming: u8,
    ) -> Result<bool, DecodeError> {
        if self.is_resident(file, dimming) {
            return Ok(false);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("decode {} at dimming {}", file.get(), dimming);

        let name = self.format.file_name(file.get());
        let mut source = StoreSource::new(store, name.as_str());
        self.decodes = self.decodes.wrapping_add(1);

        match self.format.decode(&mut source, dimming, &mut self.frame) {
            Ok(_) => {
                self.resident = Some(Resident { file, dimming });
                Ok(true)
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("decode of {} failed: {}", file.get(), e);
                if e.touched_frame() {
                    self.resident = None;
                }
                Err(e)
            }
        }
    }

    /// Force the next [`FrameCache::ensure_resident`] to decode
    pub fn invalidate(&mut self) {
        self.resident = None;
    }

    /// Image the seconds-ones panel will need after `seconds_ones`
    ///
    /// `None` when the digit is blanked.
    pub fn compute_prefetch_target(seconds_ones: DigitValue, face_set: FaceSet) -> Option<FileIndex> {
        FileIndex::new(face_set, seconds_ones.next())
    }

    /// Record the image to decode during idle time
    pub fn set_prefetch_target(&mut self, target: Option<FileIndex>) {
        self.prefetch_target = target;
    }

    /// Image to decode during idle time
    pub fn prefetch_target(&self) -> Option<FileIndex> {
        self.prefetch_target
    }
}
