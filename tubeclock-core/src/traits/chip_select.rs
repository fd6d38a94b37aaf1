//! Bus arbiter trait

use crate::digit::PanelIndex;

/// Which panels currently latch SPI traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// No panel selected
    None,
    /// Exactly one panel selected
    One(PanelIndex),
    /// Every panel selected, for broadcast writes
    All,
}

impl Selection {
    /// Check if `panel` receives traffic under this selection
    pub fn includes(self, panel: PanelIndex) -> bool {
        match self {
            Selection::None => false,
            Selection::One(p) => p == panel,
            Selection::All => true,
        }
    }
}

/// Exclusive panel selection on the shared SPI bus
///
/// After [`ChipSelect::select`] returns, only that panel's enable line is
/// active; no intermediate state ever has two single panels active at once.
/// Callers must flush the bus before changing the selection.
pub trait ChipSelect {
    /// Select one panel, deselecting every other
    ///
    /// Idempotent; may be called every tick for the same panel.
    fn select(&mut self, panel: PanelIndex);

    /// Select every panel at once
    ///
    /// Only for writes that are identical on all panels (init, clear).
    fn select_all(&mut self);

    /// Deselect every panel
    fn select_none(&mut self);

    /// Current selection
    fn selection(&self) -> Selection;
}

impl<C: ChipSelect + ?Sized> ChipSelect for &mut C {
    fn select(&mut self, panel: PanelIndex) {
        (**self).select(panel)
    }

    fn select_all(&mut self) {
        (**self).select_all()
    }

    fn select_none(&mut self) {
        (**self).select_none()
    }

    fn selection(&self) -> Selection {
        (**self).selection()
    }
}
