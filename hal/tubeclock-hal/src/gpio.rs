//! GPIO pin abstractions
//!
//! Chip-select lines, the shift-register latch/data/clock triple and the
//! panel data/command line are all plain push-pull outputs.

/// Digital output pin
///
/// Writes are assumed infallible, which holds for every on-chip GPIO the
/// clock boards use.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Logic level paired with a polarity
///
/// Converts a logical "active" request into the electrical level for pins
/// that may be wired active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active = high
    ActiveHigh,
    /// Active = low
    ActiveLow,
}

impl Polarity {
    /// Build from an "inverted" flag as stored in pin tables
    pub const fn from_inverted(inverted: bool) -> Self {
        if inverted {
            Polarity::ActiveLow
        } else {
            Polarity::ActiveHigh
        }
    }

    /// Electrical level for a logical state
    pub const fn level(self, active: bool) -> bool {
        match self {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        }
    }

    /// Drive `pin` to the level meaning `active`
    pub fn drive<P: OutputPin + ?Sized>(self, pin: &mut P, active: bool) {
        pin.set_state(self.level(active));
    }
}
