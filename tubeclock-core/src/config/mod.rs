//! Clock configuration
//!
//! Wiring tables, panel geometry and the day/night dimming schedule. The
//! whole [`ClockConfig`] is persisted as one postcard blob.

mod hardware;
mod types;

pub use hardware::*;
pub use types::*;
