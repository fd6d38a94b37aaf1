//! Direct chip select
//!
//! One enable line per panel, each with its own polarity.

use tubeclock_core::config::PinConfig;
use tubeclock_core::traits::{ChipSelect, Selection};
use tubeclock_core::{PanelIndex, PANEL_COUNT};
use tubeclock_hal::gpio::Polarity;
use tubeclock_hal::OutputPin;

/// Chip select driving one GPIO per panel
///
/// On `select`, every other line is released before the new one is
/// asserted, so two panels are never enabled together.
pub struct DirectChipSelect<P> {
    pins: [P; PANEL_COUNT],
    polarity: [Polarity; PANEL_COUNT],
    selection: Selection,
}

impl<P: OutputPin> DirectChipSelect<P> {
    /// Create a chip select with every panel deselected
    pub fn new(pins: [P; PANEL_COUNT], polarity: [Polarity; PANEL_COUNT]) -> Self {
        let mut cs = Self {
            pins,
            polarity,
            selection: Selection::All,
        };
        cs.select_none();
        cs
    }

    /// Create from a pin table, taking each line's polarity from its config
    pub fn from_config(pins: [P; PANEL_COUNT], config: &[PinConfig; PANEL_COUNT]) -> Self {
        let polarity = core::array::from_fn(|i| Polarity::from_inverted(config[i].inverted));
        Self::new(pins, polarity)
    }

    fn drive(&mut self, index: usize, active: bool) {
        self.polarity[index].drive(&mut self.pins[index], active);
    }
}

impl<P: OutputPin> ChipSelect for DirectChipSelect<P> {
    fn select(&mut self, panel: PanelIndex) {
        let target = panel.as_usize();
        for i in (0..PANEL_COUNT).filter(|&i| i != target) {
            self.drive(i, false);
        }
        self.drive(target, true);
        self.selection = Selection::One(panel);
    }

    fn select_all(&mut self) {
        for i in 0..PANEL_COUNT {
            self.drive(i, true);
        }
        self.selection = Selection::All;
    }

    fn select_none(&mut self) {
        for i in 0..PANEL_COUNT {
            self.drive(i, false);
        }
        self.selection = Selection::None;
    }

    fn selection(&self) -> Selection {
        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Electrical line levels plus a snapshot after every write
    #[derive(Default)]
    struct Lines {
        high: [bool; PANEL_COUNT],
        history: Vec<[bool; PANEL_COUNT]>,
    }

    struct MockPin {
        index: usize,
        lines: Rc<RefCell<Lines>>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            let mut lines = self.lines.borrow_mut();
            lines.high[self.index] = true;
            let snapshot = lines.high;
            lines.history.push(snapshot);
        }

        fn set_low(&mut self) {
            let mut lines = self.lines.borrow_mut();
            lines.high[self.index] = false;
            let snapshot = lines.high;
            lines.history.push(snapshot);
        }

        fn is_set_high(&self) -> bool {
            self.lines.borrow().high[self.index]
        }
    }

    fn active_low_cs() -> (DirectChipSelect<MockPin>, Rc<RefCell<Lines>>) {
        let lines = Rc::new(RefCell::new(Lines::default()));
        let pins = core::array::from_fn(|index| MockPin {
            index,
            lines: lines.clone(),
        });
        let cs = DirectChipSelect::new(pins, [Polarity::ActiveLow; PANEL_COUNT]);
        lines.borrow_mut().history.clear();
        (cs, lines)
    }

    fn active_count(levels: &[bool; PANEL_COUNT]) -> usize {
        // Active low
        levels.iter().filter(|high| !**high).count()
    }

    fn panel(i: u8) -> PanelIndex {
        PanelIndex::new(i).unwrap()
    }

    #[test]
    fn test_starts_deselected() {
        let (cs, lines) = active_low_cs();
        assert_eq!(cs.selection(), Selection::None);
        assert_eq!(active_count(&lines.borrow().high), 0);
    }

    #[test]
    fn test_select_3_then_1() {
        let (mut cs, lines) = active_low_cs();
        cs.select(panel(3));
        assert!(!lines.borrow().high[3]);
        cs.select(panel(1));

        let lines = lines.borrow();
        assert!(lines.high[3]);
        assert!(!lines.high[1]);
        assert_eq!(cs.selection(), Selection::One(panel(1)));
        for snapshot in &lines.history {
            assert!(active_count(snapshot) <= 1);
            assert!(snapshot[1] || snapshot[3], "3 and 1 active together");
        }
    }

    #[test]
    fn test_select_is_idempotent() {
        let (mut cs, lines) = active_low_cs();
        cs.select(panel(2));
        cs.select(panel(2));
        assert_eq!(cs.selection(), Selection::One(panel(2)));
        assert_eq!(active_count(&lines.borrow().high), 1);
    }

    #[test]
    fn test_select_all_and_none() {
        let (mut cs, lines) = active_low_cs();
        cs.select_all();
        assert_eq!(active_count(&lines.borrow().high), PANEL_COUNT);
        assert_eq!(cs.selection(), Selection::All);
        cs.select_none();
        assert_eq!(active_count(&lines.borrow().high), 0);
    }

    #[test]
    fn test_from_config_polarity() {
        let lines = Rc::new(RefCell::new(Lines::default()));
        let pins = core::array::from_fn(|index| MockPin {
            index,
            lines: lines.clone(),
        });
        let mut config = [PinConfig::new(0); PANEL_COUNT];
        config[0] = PinConfig::inverted(0);
        let mut cs = DirectChipSelect::from_config(pins, &config);

        // Panel 0 idles high, the others idle low
        assert!(lines.borrow().high[0]);
        assert!(!lines.borrow().high[1]);
        cs.select(panel(1));
        assert!(lines.borrow().high[0]);
        assert!(lines.borrow().high[1]);
    }

    proptest! {
        #[test]
        fn prop_single_selects_never_overlap(targets in proptest::collection::vec(0u8..6, 1..40)) {
            let (mut cs, lines) = active_low_cs();
            for t in &targets {
                cs.select(panel(*t));
            }
            let lines = lines.borrow();
            for snapshot in &lines.history {
                prop_assert!(active_count(snapshot) <= 1);
            }
            let last = *targets.last().unwrap() as usize;
            prop_assert!(!lines.high[last]);
            prop_assert_eq!(active_count(&lines.high), 1);
        }
    }
}
