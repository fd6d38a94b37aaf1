//! Shift-register chip select
//!
//! The enable lines hang off a 74HC595-style serial-in, parallel-out
//! register. Every selection change shifts the complete enable vector in
//! and then pulses the latch; the outputs only change on the latch edge, so
//! the old and new panel switch in the same instant.

use tubeclock_core::config::{ChipSelectConfig, ConfigError, ShiftOrder};
use tubeclock_core::traits::{ChipSelect, Selection};
use tubeclock_core::{PanelIndex, PANEL_COUNT};
use tubeclock_hal::gpio::Polarity;
use tubeclock_hal::OutputPin;

/// How panels map onto register outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterLayout {
    /// Register output (Q index) wired to each panel
    pub outputs: [u8; PANEL_COUNT],
    /// Register width in bits, 1 to 32
    pub register_bits: u8,
    /// Output level that enables a panel
    pub polarity: Polarity,
    /// Bit order on the data pin
    pub shift_order: ShiftOrder,
}

impl Default for RegisterLayout {
    /// One 8-bit register: Q5 = panel 0 down to Q0 = panel 5, active low
    fn default() -> Self {
        Self {
            outputs: [5, 4, 3, 2, 1, 0],
            register_bits: 8,
            polarity: Polarity::ActiveLow,
            shift_order: ShiftOrder::HighestFirst,
        }
    }
}

impl RegisterLayout {
    /// Layout from register fields, unchecked
    pub const fn new(
        outputs: [u8; PANEL_COUNT],
        register_bits: u8,
        active_low: bool,
        shift_order: ShiftOrder,
    ) -> Self {
        Self {
            outputs,
            register_bits,
            polarity: Polarity::from_inverted(active_low),
            shift_order,
        }
    }

    /// Layout from a shift-register config; `Ok(None)` for direct lines
    ///
    /// Rejects output tables that would leave a panel unselectable or
    /// select two panels at once.
    pub fn from_config(config: &ChipSelectConfig) -> Result<Option<Self>, ConfigError> {
        config.validate()?;
        Ok(match *config {
            ChipSelectConfig::ShiftRegister {
                outputs,
                register_bits,
                active_low,
                shift_order,
                ..
            } => Some(Self::new(outputs, register_bits, active_low, shift_order)),
            ChipSelectConfig::Direct { .. } => None,
        })
    }

    /// Register word enabling the panels in `panels` (bit p = panel p)
    ///
    /// Outputs not wired to a panel are held at the inactive level.
    pub fn word(&self, panels: u8) -> u32 {
        let mut word = 0u32;
        for q in 0..self.register_bits.min(32) {
            let active = self
                .outputs
                .iter()
                .enumerate()
                .any(|(p, &out)| out == q && panels & (1 << p) != 0);
            if self.polarity.level(active) {
                word |= 1 << q;
            }
        }
        word
    }
}

/// Chip select behind a shift register
pub struct ShiftRegisterChipSelect<P> {
    latch: P,
    data: P,
    clock: P,
    layout: RegisterLayout,
    selection: Selection,
}

impl<P: OutputPin> ShiftRegisterChipSelect<P> {
    /// Create a chip select with every panel deselected
    pub fn new(latch: P, data: P, clock: P, layout: RegisterLayout) -> Self {
        let mut cs = Self {
            latch,
            data,
            clock,
            layout,
            selection: Selection::All,
        };
        cs.data.set_low();
        cs.clock.set_low();
        cs.latch.set_low();
        cs.select_none();
        cs
    }

    /// Register layout in use
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Shift a full register word out and latch it
    fn push(&mut self, panels: u8) {
        let word = self.layout.word(panels);
        let bits = self.layout.register_bits.min(32);

        self.latch.set_low();
        for i in 0..bits {
            let q = match self.layout.shift_order {
                ShiftOrder::HighestFirst => bits - 1 - i,
                ShiftOrder::LowestFirst => i,
            };
            self.data.set_state(word & (1 << q) != 0);
            self.clock.set_high();
            self.clock.set_low();
        }
        self.latch.set_high();
    }
}

impl<P: OutputPin> ChipSelect for ShiftRegisterChipSelect<P> {
    fn select(&mut self, panel: PanelIndex) {
        self.push(1 << panel.get());
        self.selection = Selection::One(panel);
    }

    fn select_all(&mut self) {
        self.push((1 << PANEL_COUNT) - 1);
        self.selection = Selection::All;
    }

    fn select_none(&mut self) {
        self.push(0);
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

    /// 74HC595 model: shifts on clock rise, copies to outputs on latch rise
    #[derive(Default)]
    struct Register {
        width: u8,
        data: bool,
        clock: bool,
        latch: bool,
        shift: u32,
        outputs: u32,
        latched: Vec<u32>,
    }

    #[derive(Clone, Copy)]
    enum Role {
        Latch,
        Data,
        Clock,
    }

    struct MockPin {
        role: Role,
        reg: Rc<RefCell<Register>>,
    }

    impl MockPin {
        fn set(&mut self, high: bool) {
            let mut r = self.reg.borrow_mut();
            match self.role {
                Role::Data => r.data = high,
                Role::Clock => {
                    if high && !r.clock {
                        let mask = if r.width >= 32 { u32::MAX } else { (1 << r.width) - 1 };
                        r.shift = ((r.shift << 1) | r.data as u32) & mask;
                    }
                    r.clock = high;
                }
                Role::Latch => {
                    if high && !r.latch {
                        r.outputs = r.shift;
                        let out = r.outputs;
                        r.latched.push(out);
                    }
                    r.latch = high;
                }
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.set(true);
        }

        fn set_low(&mut self) {
            self.set(false);
        }

        fn is_set_high(&self) -> bool {
            let r = self.reg.borrow();
            match self.role {
                Role::Data => r.data,
                Role::Clock => r.clock,
                Role::Latch => r.latch,
            }
        }
    }

    fn build(layout: RegisterLayout) -> (ShiftRegisterChipSelect<MockPin>, Rc<RefCell<Register>>) {
        let reg = Rc::new(RefCell::new(Register {
            width: layout.register_bits,
            ..Default::default()
        }));
        let pin = |role| MockPin {
            role,
            reg: reg.clone(),
        };
        let cs = ShiftRegisterChipSelect::new(pin(Role::Latch), pin(Role::Data), pin(Role::Clock), layout);
        (cs, reg)
    }

    /// Panels whose output is at the active level
    fn active_panels(layout: &RegisterLayout, outputs: u32) -> Vec<usize> {
        (0..PANEL_COUNT)
            .filter(|&p| {
                let high = outputs & (1 << layout.outputs[p]) != 0;
                high == layout.polarity.level(true)
            })
            .collect()
    }

    fn panel(i: u8) -> PanelIndex {
        PanelIndex::new(i).unwrap()
    }

    #[test]
    fn test_default_word_matches_board() {
        let layout = RegisterLayout::default();
        // Active low: Q5 low for panel 0, every other output high
        assert_eq!(layout.word(0b00_0001), 0b1101_1111);
        // Q0 low for panel 5
        assert_eq!(layout.word(0b10_0000), 0b1111_1110);
        assert_eq!(layout.word(0), 0xFF);
        assert_eq!(layout.word(0b11_1111), 0b1100_0000);
    }

    #[test]
    fn test_starts_deselected() {
        let layout = RegisterLayout::default();
        let (cs, reg) = build(layout);
        assert_eq!(cs.selection(), Selection::None);
        assert!(active_panels(&layout, reg.borrow().outputs).is_empty());
    }

    #[test]
    fn test_select_lands_on_mapped_output() {
        let layout = RegisterLayout::default();
        let (mut cs, reg) = build(layout);
        cs.select(panel(0));
        assert_eq!(reg.borrow().outputs, 0b1101_1111);
        assert_eq!(active_panels(&layout, reg.borrow().outputs), [0]);
    }

    #[test]
    fn test_select_3_then_1_switches_on_one_latch() {
        let layout = RegisterLayout::default();
        let (mut cs, reg) = build(layout);
        reg.borrow_mut().latched.clear();

        cs.select(panel(3));
        cs.select(panel(1));

        let reg = reg.borrow();
        assert_eq!(reg.latched.len(), 2);
        assert_eq!(active_panels(&layout, reg.latched[0]), [3]);
        assert_eq!(active_panels(&layout, reg.latched[1]), [1]);
    }

    #[test]
    fn test_lowest_first_active_high() {
        let layout = RegisterLayout {
            outputs: [0, 1, 2, 3, 4, 5],
            register_bits: 8,
            polarity: Polarity::ActiveHigh,
            shift_order: ShiftOrder::LowestFirst,
        };
        let (mut cs, reg) = build(layout);
        cs.select(panel(2));
        // Pushed Q0 first, so the model register holds the word bit-reversed
        assert_eq!(reg.borrow().outputs, 0b0010_0000);
    }

    #[test]
    fn test_sixteen_bit_chain() {
        let layout = RegisterLayout {
            outputs: [8, 9, 10, 11, 12, 13],
            register_bits: 16,
            polarity: Polarity::ActiveLow,
            shift_order: ShiftOrder::HighestFirst,
        };
        let (mut cs, reg) = build(layout);
        cs.select(panel(5));
        assert_eq!(active_panels(&layout, reg.borrow().outputs), [5]);
        assert_eq!(reg.borrow().outputs, 0xFFFF & !(1 << 13));
    }

    #[test]
    fn test_select_all() {
        let layout = RegisterLayout::default();
        let (mut cs, reg) = build(layout);
        cs.select_all();
        assert_eq!(active_panels(&layout, reg.borrow().outputs).len(), PANEL_COUNT);
        cs.select_none();
        assert!(active_panels(&layout, reg.borrow().outputs).is_empty());
    }

    #[test]
    fn test_layout_from_config() {
        let layout = RegisterLayout::from_config(&ChipSelectConfig::default()).unwrap();
        assert_eq!(layout, Some(RegisterLayout::default()));
        assert_eq!(RegisterLayout::from_config(&ChipSelectConfig::direct_h401()), Ok(None));
    }

    fn register_config(outputs: [u8; PANEL_COUNT], register_bits: u8) -> ChipSelectConfig {
        ChipSelectConfig::ShiftRegister {
            latch: 17,
            data: 14,
            clock: 16,
            outputs,
            register_bits,
            active_low: true,
            shift_order: ShiftOrder::HighestFirst,
        }
    }

    #[test]
    fn test_layout_rejects_bad_wiring() {
        // Q9 does not exist on one 8-bit register
        assert_eq!(
            RegisterLayout::from_config(&register_config([9, 4, 3, 2, 1, 0], 8)),
            Err(ConfigError::RegisterWidth)
        );
        // Panels 0 and 1 would latch the same word
        assert_eq!(
            RegisterLayout::from_config(&register_config([5, 5, 3, 2, 1, 0], 8)),
            Err(ConfigError::DuplicateLine)
        );
        assert_eq!(
            RegisterLayout::from_config(&register_config([5, 4, 3, 2, 1, 0], 0)),
            Err(ConfigError::RegisterWidth)
        );
        assert_eq!(
            RegisterLayout::from_config(&register_config([5, 4, 3, 2, 1, 0], 33)),
            Err(ConfigError::RegisterWidth)
        );
    }

    proptest! {
        #[test]
        fn prop_latched_states_select_at_most_one(
            targets in proptest::collection::vec(0u8..6, 1..40),
            active_low in any::<bool>(),
        ) {
            let layout = RegisterLayout {
                polarity: Polarity::from_inverted(active_low),
                ..RegisterLayout::default()
            };
            let (mut cs, reg) = build(layout);
            for t in &targets {
                cs.select(panel(*t));
            }
            let reg = reg.borrow();
            for state in &reg.latched {
                prop_assert!(active_panels(&layout, *state).len() <= 1);
            }
            let last = *targets.last().unwrap() as usize;
            prop_assert_eq!(active_panels(&layout, reg.outputs), vec![last]);
        }
    }
}
