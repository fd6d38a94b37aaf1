//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tubeclock-core, written against the tubeclock-hal pin and bus traits:
//!
//! - Chip select (direct enable lines, 74HC595 shift register)
//! - ST7789 TFT panel
//! - Panel power switch

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod chip_select;
pub mod panel;
pub mod power;

pub use chip_select::{AnyChipSelect, DirectChipSelect, RegisterLayout, ShiftRegisterChipSelect};
pub use panel::St7789;
pub use power::PanelPower;
