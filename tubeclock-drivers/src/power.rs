//! Panel power switch
//!
//! One line switches the supply (or backlight) of all six panels. Panels
//! lose their controller state when powered off; after `enable` the caller
//! re-runs panel init and force-redraws every digit.

use tubeclock_core::config::PinConfig;
use tubeclock_hal::gpio::Polarity;
use tubeclock_hal::OutputPin;

/// Power switch for all panels
pub struct PanelPower<P> {
    pin: P,
    polarity: Polarity,
    enabled: bool,
}

impl<P: OutputPin> PanelPower<P> {
    /// Create a switch; panels start powered off
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut power = Self {
            pin,
            polarity,
            enabled: true,
        };
        power.disable();
        power
    }

    /// Create from a pin config
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self::new(pin, Polarity::from_inverted(config.inverted))
    }

    /// Power the panels
    pub fn enable(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("panel power on");
        self.polarity.drive(&mut self.pin, true);
        self.enabled = true;
    }

    /// Cut panel power
    pub fn disable(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("panel power off");
        self.polarity.drive(&mut self.pin, false);
        self.enabled = false;
    }

    /// Flip the power state, returning the new state
    pub fn toggle(&mut self) -> bool {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
        self.enabled
    }

    /// Check if the panels are powered
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
