//! Tubeclock Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display pipeline is written
//! against. Board crates implement them directly, or wrap their
//! `embedded-hal` 1.0 peripherals with the adapters in [`eh`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tubeclock-display (renderer, cache)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tubeclock-drivers (chip select, TFT)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tubeclock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (chip-select lines, latch, D/C)
//! - [`spi::SpiBus`] - Write-only SPI master shared by all panels
//! - [`storage::ImageStore`] - Read-only named image resources

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod eh;
pub mod gpio;
pub mod spi;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::SpiBus;
pub use storage::{ImageStore, StorageError};
