//! Idle-time prefetch
//!
//! The control loop has a fixed tick budget. When a tick finishes early the
//! spare time is spent decoding the image the seconds-ones panel will need
//! on the next tick, so that render is a cache hit.
//!
//! Only the seconds-ones image is ever prefetched. With a single buffer,
//! prefetching anything else would evict exactly the image needed next.

use embassy_time::{Duration, Instant};
use tubeclock_core::FileIndex;
use tubeclock_hal::ImageStore;
use tubeclock_image::DecodeError;

use crate::cache::FrameCache;

/// Control loop tick budget
pub const TICK_BUDGET: Duration = Duration::from_millis(20);

/// Time left in the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickBudget {
    start: Instant,
    budget: Duration,
}

impl TickBudget {
    /// Start a tick of `budget` at `now`
    pub const fn new(start: Instant, budget: Duration) -> Self {
        Self { start, budget }
    }

    /// Start a standard tick at `now`
    pub const fn start_at(now: Instant) -> Self {
        Self::new(now, TICK_BUDGET)
    }

    /// Start a standard tick now
    pub fn start() -> Self {
        Self::start_at(Instant::now())
    }

    /// Budget left at `now`; zero once spent
    pub fn remaining_at(&self, now: Instant) -> Duration {
        let elapsed = now
            .checked_duration_since(self.start)
            .unwrap_or(Duration::from_ticks(0));
        self.budget
            .checked_sub(elapsed)
            .unwrap_or(Duration::from_ticks(0))
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn is_spent_at(&self, now: Instant) -> bool {
        self.remaining_at(now) == Duration::from_ticks(0)
    }
}

/// What a prefetch attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrefetchOutcome {
    /// Target decoded into the buffer
    Decoded(FileIndex),
    /// Target was already resident
    Resident,
    /// Nothing to prefetch yet
    NoTarget,
    /// Tick budget already spent
    NoBudget,
    /// Target failed earlier under the same dimming; not retried until
    /// [`PrefetchScheduler::forget_failures`]
    KnownBad,
    /// Decode failed
    Failed(DecodeError),
}

/// Decides when the prefetch target is decoded
#[derive(Debug, Default)]
pub struct PrefetchScheduler {
    decoded: u32,
    failed: Option<(FileIndex, u8)>,
}

impl PrefetchScheduler {
    pub const fn new() -> Self {
        Self {
            decoded: 0,
            failed: None,
        }
    }

    /// Number of prefetch decodes performed
    pub fn decoded_count(&self) -> u32 {
        self.decoded
    }

    /// Allow a target that failed before to be tried again
    pub fn forget_failures(&mut self) {
        self.failed = None;
    }

    /// Decode the cache's prefetch target if time remains and it is not resident
    pub fn prefetch_if_idle<S, const W: usize, const H: usize>(
        &mut self,
        cache: &mut FrameCache<W, H>,
        store: &mut S,
        dimming: u8,
        remaining: Duration,
    ) -> PrefetchOutcome
    where
        S: ImageStore + ?Sized,
    {
        if remaining == Duration::from_ticks(0) {
            return PrefetchOutcome::NoBudget;
        }
        let Some(target) = cache.prefetch_target() else {
            return PrefetchOutcome::NoTarget;
        };
        if cache.is_resident(target, dimming) {
            return PrefetchOutcome::Resident;
        }
        if self.failed == Some((target, dimming)) {
            return PrefetchOutcome::KnownBad;
        }

        match cache.ensure_resident(store, target, dimming) {
            Ok(_) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("prefetched {}", target.get());
                self.decoded = self.decoded.wrapping_add(1);
                self.failed = None;
                PrefetchOutcome::Decoded(target)
            }
            Err(e) => {
                self.failed = Some((target, dimming));
                PrefetchOutcome::Failed(e)
            }
        }
    }
}
