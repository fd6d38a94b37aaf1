//! Digit rendering for the six-panel clock
//!
//! This crate provides:
//! - [`FrameCache`]: the single shared frame buffer and which image it holds
//! - [`DigitRenderer`]: position + value to panel, through the cache
//! - [`PrefetchScheduler`]: idle-time decode of the next seconds image
//! - [`Overlay`]: status text drawn over a digit
//!
//! # Tick flow
//!
//! ```text
//! clock/menu ──► DigitRenderer ──► FrameCache ──► codec (tubeclock-image)
//!                     │
//!                     ▼
//!               ChipSelect + Panel ──► one TFT
//!
//! spare time ──► PrefetchScheduler ──► FrameCache
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod cache;
pub mod error;
pub mod overlay;
pub mod prefetch;
pub mod renderer;

// Re-export key types
pub use cache::{FrameCache, StoreSource};
pub use error::RenderError;
pub use overlay::{Overlay, OverlayStrip};
pub use prefetch::{PrefetchOutcome, PrefetchScheduler, TickBudget, TICK_BUDGET};
pub use renderer::{DigitRenderer, ShowPolicy};
