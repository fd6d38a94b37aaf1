//! Board-agnostic core logic for the six-panel clock display
//!
//! This crate contains everything that does not depend on a specific board:
//!
//! - Digit model: positions, values, face sets and file indices
//! - Hardware abstraction traits (chip select, panel)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod digit;
pub mod traits;

pub use digit::{
    clock_digits, DigitPosition, DigitValue, FaceSet, FileIndex, PanelIndex, MAX_FACE_SET,
    PANEL_COUNT,
};
