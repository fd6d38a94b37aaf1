//! Digit renderer
//!
//! Owns the chip select, the shared panel bus, the image store and the one
//! frame cache. A render selects the position's panel, makes the digit's
//! image resident, pushes it, draws any overlay on top and releases the
//! panel again, so no two panels are ever enabled during an image transfer.

use embassy_time::Duration;
use tubeclock_core::config::{ClockConfig, DimmingSchedule};
use tubeclock_core::traits::{ChipSelect, Panel};
use tubeclock_core::{DigitPosition, DigitValue, FaceSet, FileIndex, MAX_FACE_SET, PANEL_COUNT};
use tubeclock_hal::ImageStore;
use tubeclock_image::{ImageFormat, BLACK, FULL_BRIGHTNESS};

use crate::cache::FrameCache;
use crate::error::RenderError;
use crate::overlay::{Overlay, OverlayStrip};
use crate::prefetch::{PrefetchOutcome, PrefetchScheduler};

/// When a render request actually draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShowPolicy {
    /// Do nothing
    Skip,
    /// Draw only if the value differs from the last one drawn there
    IfChanged,
    /// Always draw, e.g. after power-up, a dimming change or a face set change
    Force,
}

/// Six-panel digit renderer
///
/// Holds a full-panel frame buffer inline; allocate it once (e.g. in a
/// static) rather than on the stack.
pub struct DigitRenderer<C, P, S, const W: usize, const H: usize> {
    chip_select: C,
    panel: P,
    store: S,
    cache: FrameCache<W, H>,
    prefetch: PrefetchScheduler,
    strip: OverlayStrip<W>,
    overlays: [Option<Overlay>; PANEL_COUNT],
    last: [Option<DigitValue>; PANEL_COUNT],
    face_set: FaceSet,
    dimming: u8,
    schedule: DimmingSchedule,
}

impl<C, P, S, const W: usize, const H: usize> DigitRenderer<C, P, S, W, H>
where
    C: ChipSelect,
    P: Panel,
    S: ImageStore,
{
    /// Create a renderer for `format` images, face set 1, full brightness
    ///
    /// Fails if the `W` x `H` frame does not fit the panel. Call
    /// [`DigitRenderer::begin`] before the first render.
    pub fn new(
        chip_select: C,
        panel: P,
        store: S,
        format: ImageFormat,
    ) -> Result<Self, RenderError> {
        if W > panel.width() as usize || H > panel.height() as usize {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "frame {}x{} exceeds panel {}x{}",
                W,
                H,
                panel.width(),
                panel.height()
            );
            return Err(RenderError::FrameSize);
        }

        Ok(Self {
            chip_select,
            panel,
            store,
            cache: FrameCache::new(format),
            prefetch: PrefetchScheduler::new(),
            strip: OverlayStrip::new(),
            overlays: core::array::from_fn(|_| None),
            last: [None; PANEL_COUNT],
            face_set: FaceSet::default(),
            dimming: FULL_BRIGHTNESS,
            schedule: DimmingSchedule::default(),
        })
    }

    /// Create a renderer from a stored clock configuration
    ///
    /// The whole configuration is validated first, including the chip
    /// select wiring `chip_select` was built from.
    pub fn from_config(
        chip_select: C,
        panel: P,
        store: S,
        config: &ClockConfig,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        let face_set = config.face_set().ok_or(RenderError::InvalidFaceSet)?;
        let mut renderer = Self::new(chip_select, panel, store, config.image_format)?;
        renderer.face_set = face_set;
        renderer.schedule = config.dimming;
        Ok(renderer)
    }

    /// Initialise every panel and clear it to black
    ///
    /// Also used after the panels were powered back on: they lose their
    /// controller state, so everything is re-initialised and every position
    /// redraws on its next render.
    pub fn begin(&mut self) -> Result<(), RenderError> {
        self.chip_select.select_all();
        let result = self
            .panel
            .init()
            .and_then(|()| self.panel.fill_screen(BLACK));
        self.chip_select.select_none();

        self.cache.invalidate();
        self.prefetch.forget_failures();
        self.last = [None; PANEL_COUNT];

        if let Err(e) = result {
            #[cfg(feature = "defmt")]
            defmt::error!("panel init failed: {}", e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Blank every panel at once
    pub fn clear_all(&mut self) -> Result<(), RenderError> {
        self.chip_select.select_all();
        let result = self.panel.fill_screen(BLACK);
        self.chip_select.select_none();

        self.last = [None; PANEL_COUNT];
        result.map_err(RenderError::from)
    }

    /// Draw `value` at `position` according to `policy`
    ///
    /// Returns whether anything was drawn. On failure the panel keeps its
    /// previous content and the value is not recorded, so the next
    /// [`ShowPolicy::IfChanged`] request retries.
    pub fn render_digit(
        &mut self,
        position: DigitPosition,
        value: DigitValue,
        policy: ShowPolicy,
    ) -> Result<bool, RenderError> {
        let slot = position.index();
        match policy {
            ShowPolicy::Skip => return Ok(false),
            ShowPolicy::IfChanged if self.last[slot] == Some(value) => return Ok(false),
            ShowPolicy::IfChanged | ShowPolicy::Force => {}
        }

        self.chip_select.select(position.panel());
        let result = self.draw(position, value);
        self.chip_select.select_none();

        if position == DigitPosition::SecondsOnes {
            self.cache
                .set_prefetch_target(FrameCache::<W, H>::compute_prefetch_target(value, self.face_set));
        }

        match result {
            Ok(()) => {
                self.last[slot] = Some(value);
                Ok(true)
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                if let RenderError::Transfer(t) = e {
                    defmt::error!("transfer to panel {} failed: {}", position.panel().get(), t);
                }
                Err(e)
            }
        }
    }

    /// Image, then overlay, to the selected panel
    fn draw(&mut self, position: DigitPosition, value: DigitValue) -> Result<(), RenderError> {
        match FileIndex::new(self.face_set, value) {
            None => self.panel.fill_screen(BLACK)?,
            Some(file) => {
                self.cache.ensure_resident(&mut self.store, file, self.dimming)?;
                self.panel.write_frame(self.cache.frame())?;
            }
        }

        if let Some(overlay) = &self.overlays[position.index()] {
            let area = self.strip.render(overlay, self.panel.height());
            self.panel.write_pixels(area, self.strip.pixels())?;
        }
        Ok(())
    }

    /// Draw all six positions, seconds first
    ///
    /// `values` is indexed by [`DigitPosition::index`]. Every position is
    /// attempted; the first error is returned. Otherwise returns how many
    /// panels were drawn.
    pub fn render_all(
        &mut self,
        values: &[DigitValue; PANEL_COUNT],
        policy: ShowPolicy,
    ) -> Result<usize, RenderError> {
        let mut drawn = 0;
        let mut first_error = None;
        for position in DigitPosition::ALL {
            match self.render_digit(position, values[position.index()], policy) {
                Ok(true) => drawn += 1,
                Ok(false) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(drawn),
        }
    }

    /// Show `overlay` on its position from the next render on
    pub fn set_overlay(&mut self, overlay: Overlay) {
        let slot = overlay.position().index();
        if self.overlays[slot].as_ref() != Some(&overlay) {
            self.overlays[slot] = Some(overlay);
            self.last[slot] = None;
        }
    }

    /// Remove any overlay from `position`
    pub fn clear_overlay(&mut self, position: DigitPosition) {
        let slot = position.index();
        if self.overlays[slot].take().is_some() {
            self.last[slot] = None;
        }
    }

    pub fn overlay(&self, position: DigitPosition) -> Option<&Overlay> {
        self.overlays[position.index()].as_ref()
    }

    /// Set the dimming factor (255 = full brightness)
    ///
    /// Returns `true` when it changed; the caller should then force-render.
    pub fn set_dimming(&mut self, factor: u8) -> bool {
        if factor == self.dimming {
            return false;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("dimming {} -> {}", self.dimming, factor);
        self.dimming = factor;
        self.cache.invalidate();
        true
    }

    /// Set the dimming factor for the hour of day from the schedule
    pub fn apply_schedule(&mut self, hour: u8) -> bool {
        self.set_dimming(self.schedule.factor_for_hour(hour))
    }

    pub fn set_schedule(&mut self, schedule: DimmingSchedule) {
        self.schedule = schedule;
    }

    pub fn dimming(&self) -> u8 {
        self.dimming
    }

    /// Switch face set
    ///
    /// Returns `true` when it changed; the caller should then force-render.
    pub fn set_face_set(&mut self, index: u8) -> Result<bool, RenderError> {
        let face_set = FaceSet::new(index).ok_or(RenderError::InvalidFaceSet)?;
        if face_set == self.face_set {
            return Ok(false);
        }
        self.face_set = face_set;
        self.cache.set_prefetch_target(None);
        self.last = [None; PANEL_COUNT];
        Ok(true)
    }

    pub fn face_set(&self) -> FaceSet {
        self.face_set
    }

    /// Count the face sets present in the store
    ///
    /// Looks for the "0" image of sets 1, 2, ... and stops at the first gap.
    pub fn face_set_count(&mut self) -> u8 {
        let format = self.cache.format();
        let mut count = 0;
        for index in 1..=MAX_FACE_SET {
            let Some(set) = FaceSet::new(index) else {
                break;
            };
            let name = format.file_name(set.first_file().get());
            if !self.store.exists(&name) {
                break;
            }
            count = index;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("{} face sets found", count);
        count
    }

    /// Number of panels driven
    pub const fn panel_count(&self) -> usize {
        PANEL_COUNT
    }

    /// Force the next render of every digit to decode again
    ///
    /// Use after the store changed underneath; images that failed to
    /// prefetch are tried again too.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
        self.prefetch.forget_failures();
    }

    /// Decode the next seconds image if `remaining` tick budget allows
    pub fn prefetch_if_idle(&mut self, remaining: Duration) -> PrefetchOutcome {
        self.prefetch
            .prefetch_if_idle(&mut self.cache, &mut self.store, self.dimming, remaining)
    }

    pub fn cache(&self) -> &FrameCache<W, H> {
        &self.cache
    }

    pub fn chip_select(&self) -> &C {
        &self.chip_select
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Give back the chip select, panel and store
    pub fn release(self) -> (C, P, S) {
        (self.chip_select, self.panel, self.store)
    }
}
