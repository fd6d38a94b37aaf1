//! Hardware configuration types
//!
//! These types describe how the six panels are wired: which lines select
//! them, how the shared SPI bus is clocked, and where the panel power
//! switch sits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tubeclock_image::ImageFormat;

use super::types::DimmingSchedule;
use crate::digit::{FaceSet, PanelIndex, PANEL_COUNT};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO number on the board
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create an active-high pin
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Order in which register bits leave the data pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShiftOrder {
    /// Highest output first; it travels furthest down the chain
    #[default]
    HighestFirst,
    /// Output 0 first
    LowestFirst,
}

/// How panels are selected on the shared bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChipSelectConfig {
    /// One enable line per panel, indexed by [`PanelIndex`]
    Direct {
        /// Enable line for each panel
        pins: [PinConfig; PANEL_COUNT],
    },
    /// Serial-in, parallel-out shift register (74HC595 style)
    ShiftRegister {
        /// Storage register clock; outputs change on its rising edge
        latch: u8,
        /// Serial data
        data: u8,
        /// Shift clock
        clock: u8,
        /// Register output (Q index) wired to each panel
        outputs: [u8; PANEL_COUNT],
        /// Register width in bits, 8 per chained chip
        register_bits: u8,
        /// Outputs select a panel when low
        active_low: bool,
        /// Bit order on the data pin
        shift_order: ShiftOrder,
    },
}

impl Default for ChipSelectConfig {
    /// Single 8-bit register, Q5 = seconds ones down to Q0 = hours tens,
    /// Q7/Q6 unused, active low
    fn default() -> Self {
        ChipSelectConfig::ShiftRegister {
            latch: 17,
            data: 14,
            clock: 16,
            outputs: [5, 4, 3, 2, 1, 0],
            register_bits: 8,
            active_low: true,
            shift_order: ShiftOrder::HighestFirst,
        }
    }
}

impl ChipSelectConfig {
    /// Direct lines as wired on the H401 board (active low)
    pub const fn direct_h401() -> Self {
        ChipSelectConfig::Direct {
            pins: [
                PinConfig::inverted(15),
                PinConfig::inverted(2),
                PinConfig::inverted(27),
                PinConfig::inverted(14),
                PinConfig::inverted(12),
                PinConfig::inverted(13),
            ],
        }
    }

    /// Check the table for wiring mistakes
    ///
    /// Each panel needs its own line, and register outputs must exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ChipSelectConfig::Direct { pins } => {
                for (i, a) in pins.iter().enumerate() {
                    if pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                        return Err(ConfigError::DuplicateLine);
                    }
                }
                Ok(())
            }
            ChipSelectConfig::ShiftRegister {
                outputs,
                register_bits,
                ..
            } => {
                if *register_bits == 0 || *register_bits > 32 {
                    return Err(ConfigError::RegisterWidth);
                }
                for (i, q) in outputs.iter().enumerate() {
                    if *q >= *register_bits {
                        return Err(ConfigError::RegisterWidth);
                    }
                    if outputs[i + 1..].contains(q) {
                        return Err(ConfigError::DuplicateLine);
                    }
                }
                Ok(())
            }
        }
    }

    /// Register output for a panel, shift-register variant only
    pub fn output_for(&self, panel: PanelIndex) -> Option<u8> {
        match self {
            ChipSelectConfig::ShiftRegister { outputs, .. } => Some(outputs[panel.as_usize()]),
            ChipSelectConfig::Direct { .. } => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two panels share one select line or register output
    DuplicateLine,
    /// Register width is 0, above 32, or narrower than an output index
    RegisterWidth,
    /// Face set index out of range
    FaceSet,
    /// Stored layout version not understood
    Version,
}

/// TFT panel configuration, shared by all six panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Visible width in pixels
    pub width: u16,
    /// Visible height in pixels
    pub height: u16,
    /// Column offset of the visible area in controller RAM
    pub x_offset: u16,
    /// Row offset of the visible area in controller RAM
    pub y_offset: u16,
    /// SPI clock in Hz
    pub spi_hz: u32,
    /// Data/command select line
    pub dc_pin: u8,
    /// Power switch for all panels
    pub power_pin: PinConfig,
}

impl Default for PanelConfig {
    /// 1.14" 135x240 ST7789
    fn default() -> Self {
        Self {
            width: 135,
            height: 240,
            x_offset: 52,
            y_offset: 40,
            spi_hz: 40_000_000,
            dc_pin: 25,
            power_pin: PinConfig::inverted(4),
        }
    }
}

/// Complete clock display configuration
///
/// Top-level structure persisted in flash.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Active face set index
    pub face_set: u8,
    /// Encoding of the face images
    pub image_format: ImageFormat,
    /// Day/night dimming
    pub dimming: DimmingSchedule,
    /// Panel select wiring
    pub chip_select: ChipSelectConfig,
    /// Panel geometry and bus
    pub panel: PanelConfig,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            face_set: FaceSet::default().get(),
            image_format: ImageFormat::default(),
            dimming: DimmingSchedule::default(),
            chip_select: ChipSelectConfig::default(),
            panel: PanelConfig::default(),
        }
    }
}

impl ClockConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Active face set, if the stored index is valid
    pub fn face_set(&self) -> Option<FaceSet> {
        FaceSet::new(self.face_set)
    }

    /// Check the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Version);
        }
        if self.face_set().is_none() {
            return Err(ConfigError::FaceSet);
        }
        self.chip_select.validate()
    }
}

#[cfg(feature = "serde")]
impl ClockConfig {
    /// Serialize into `buf`, returning the used part
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Deserialize from bytes written by [`ClockConfig::to_slice`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
