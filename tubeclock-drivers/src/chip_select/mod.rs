//! Chip select drivers
//!
//! Two wirings exist in the field: one GPIO per panel, or a shift register
//! feeding all six enable lines. [`AnyChipSelect`] picks one at startup
//! from the [`ChipSelectConfig`] so callers only ever see [`ChipSelect`].

pub mod gpio;
pub mod shift_register;

pub use gpio::DirectChipSelect;
pub use shift_register::{RegisterLayout, ShiftRegisterChipSelect};

use tubeclock_core::config::{ChipSelectConfig, ConfigError};
use tubeclock_core::traits::{ChipSelect, Selection};
use tubeclock_core::PanelIndex;
use tubeclock_hal::OutputPin;

/// Chip select chosen by configuration
pub enum AnyChipSelect<P> {
    Direct(DirectChipSelect<P>),
    ShiftRegister(ShiftRegisterChipSelect<P>),
}

impl<P: OutputPin> AnyChipSelect<P> {
    /// Build the configured chip select
    ///
    /// `make_pin` turns a GPIO number from the config into an output pin.
    /// Fails before any pin is made if two panels share a line or an
    /// output does not exist.
    pub fn from_config(
        config: &ChipSelectConfig,
        mut make_pin: impl FnMut(u8) -> P,
    ) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            #[cfg(feature = "defmt")]
            defmt::error!("chip select config rejected: {}", e);
            return Err(e);
        }

        Ok(match *config {
            ChipSelectConfig::Direct { pins } => {
                let outputs = core::array::from_fn(|i| make_pin(pins[i].pin));
                AnyChipSelect::Direct(DirectChipSelect::from_config(outputs, &pins))
            }
            ChipSelectConfig::ShiftRegister {
                latch,
                data,
                clock,
                outputs,
                register_bits,
                active_low,
                shift_order,
            } => {
                let layout = RegisterLayout::new(outputs, register_bits, active_low, shift_order);
                AnyChipSelect::ShiftRegister(ShiftRegisterChipSelect::new(
                    make_pin(latch),
                    make_pin(data),
                    make_pin(clock),
                    layout,
                ))
            }
        })
    }
}

impl<P: OutputPin> ChipSelect for AnyChipSelect<P> {
    fn select(&mut self, panel: PanelIndex) {
        match self {
            AnyChipSelect::Direct(cs) => cs.select(panel),
            AnyChipSelect::ShiftRegister(cs) => cs.select(panel),
        }
    }

    fn select_all(&mut self) {
        match self {
            AnyChipSelect::Direct(cs) => cs.select_all(),
            AnyChipSelect::ShiftRegister(cs) => cs.select_all(),
        }
    }

    fn select_none(&mut self) {
        match self {
            AnyChipSelect::Direct(cs) => cs.select_none(),
            AnyChipSelect::ShiftRegister(cs) => cs.select_none(),
        }
    }

    fn selection(&self) -> Selection {
        match self {
            AnyChipSelect::Direct(cs) => cs.selection(),
            AnyChipSelect::ShiftRegister(cs) => cs.selection(),
        }
    }
}
