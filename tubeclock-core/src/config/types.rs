//! Configuration type definitions
//!
//! Behavioural settings persisted alongside the hardware tables.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tubeclock_image::FULL_BRIGHTNESS;

/// Night dimming factor used when nothing else is configured
pub const DEFAULT_NIGHT_FACTOR: u8 = 20;

/// Day/night dimming schedule
///
/// Hours are 0-23. The night window starts at `night_start_hour` and ends
/// at `day_start_hour`, wrapping midnight when the start is the later hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimmingSchedule {
    /// First hour of night
    pub night_start_hour: u8,
    /// First hour of day
    pub day_start_hour: u8,
    /// Dimming factor applied at night (255 = no dimming)
    pub night_factor: u8,
}

impl Default for DimmingSchedule {
    fn default() -> Self {
        Self {
            night_start_hour: 22,
            day_start_hour: 7,
            night_factor: DEFAULT_NIGHT_FACTOR,
        }
    }
}

impl DimmingSchedule {
    /// Schedule that never dims
    pub const fn disabled() -> Self {
        Self {
            night_start_hour: 0,
            day_start_hour: 0,
            night_factor: FULL_BRIGHTNESS,
        }
    }

    /// Check if `hour` falls in the night window
    pub fn is_night(&self, hour: u8) -> bool {
        let (start, end) = (self.night_start_hour, self.day_start_hour);
        if start == end {
            false
        } else if start < end {
            hour >= start && hour < end
        } else {
            // Wraps midnight
            hour >= start || hour < end
        }
    }

    /// Dimming factor for `hour`
    pub fn factor_for_hour(&self, hour: u8) -> u8 {
        if self.is_night(hour) {
            self.night_factor
        } else {
            FULL_BRIGHTNESS
        }
    }
}
