//! Render errors

use tubeclock_core::config::ConfigError;
use tubeclock_core::traits::TransferError;
use tubeclock_image::DecodeError;

/// Errors from the render pipeline
///
/// All of them leave the control loop running; the next tick retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Image could not be decoded
    Decode(DecodeError),
    /// Panel write failed
    Transfer(TransferError),
    /// Face set outside the range whose file indices fit in a byte
    InvalidFaceSet,
    /// Stored configuration rejected
    Config(ConfigError),
    /// Frame buffer larger than the panel it is pushed to
    FrameSize,
}

impl From<DecodeError> for RenderError {
    fn from(e: DecodeError) -> Self {
        RenderError::Decode(e)
    }
}

impl From<TransferError> for RenderError {
    fn from(e: TransferError) -> Self {
        RenderError::Transfer(e)
    }
}

impl From<ConfigError> for RenderError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::FaceSet => RenderError::InvalidFaceSet,
            e => RenderError::Config(e),
        }
    }
}
