//! Hardware abstraction traits
//!
//! These traits define the interface between the display pipeline and the
//! board-specific panel and chip-select drivers.

pub mod chip_select;
pub mod panel;

pub use chip_select::{ChipSelect, Selection};
pub use panel::{Area, Panel, TransferError};
