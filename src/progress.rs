//! Simulated analysis progress.
//!
//! The progress bar is decoupled from how long the file read actually took.
//! Once started it advances by a fixed step on a fixed interval, and when it
//! reaches 100 it waits a fixed settling delay before releasing the image.
//!
//! State machine:
//! 1. `Idle`: value 0, no timer armed
//! 2. `Running`: recurring tick timer armed
//! 3. `Completing`: value is 100, tick timer dropped, one-shot redirect timer armed
//! 4. `Done`: one-shot fired, image released exactly once
//!
//! Timers are deadlines fired by [`ProgressSimulator::poll`]. Overdue ticks are
//! fired in schedule order, so the timeline is the same no matter how late the
//! host polls.

use std::time::Duration;
use web_time::Instant;

use crate::constants::{PROGRESS_INTERVAL_MS, PROGRESS_MAX, PROGRESS_STEP, REDIRECT_DELAY_MS};
use crate::model::EncodedImage;

/// Progress percentage, always in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct ProgressValue(u8);

impl ProgressValue {
    pub const ZERO: Self = Self(0);
    pub const COMPLETE: Self = Self(PROGRESS_MAX);

    /// Clamp any value into range.
    pub fn new(value: u8) -> Self {
        Self(value.min(PROGRESS_MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 >= PROGRESS_MAX
    }

    /// Add `step`, clamped at 100.
    fn advanced(self, step: u8) -> Self {
        Self::new(self.0.saturating_add(step))
    }
}

/// Timing parameters of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTiming {
    /// Time between ticks
    pub interval: Duration,
    /// Percent added per tick (at least 1)
    pub step: u8,
    /// Settling delay after reaching 100
    pub redirect_delay: Duration,
}

impl ProgressTiming {
    /// Create timing parameters. A zero step is raised to 1.
    pub fn new(interval: Duration, step: u8, redirect_delay: Duration) -> Self {
        Self {
            interval,
            step: step.max(1),
            redirect_delay,
        }
    }

    /// Number of ticks to reach 100: `ceil(100 / step)`.
    pub fn ticks_to_complete(&self) -> u32 {
        let max = u32::from(PROGRESS_MAX);
        let step = u32::from(self.step.max(1));
        max.div_ceil(step)
    }

    /// Time from start until the image is released.
    pub fn time_to_done(&self) -> Duration {
        self.interval * self.ticks_to_complete() + self.redirect_delay
    }
}

impl Default for ProgressTiming {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(PROGRESS_INTERVAL_MS),
            PROGRESS_STEP,
            Duration::from_millis(REDIRECT_DELAY_MS),
        )
    }
}

/// Simulator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Completing,
    Done,
}

/// Recurring timer handle.
#[derive(Debug, Clone, Copy)]
struct TickTimer {
    next_due: Instant,
}

/// One-shot timer handle.
#[derive(Debug, Clone, Copy)]
struct RedirectTimer {
    due: Instant,
}

/// Timed progress state machine holding the image until it is released.
#[derive(Debug)]
pub struct ProgressSimulator {
    timing: ProgressTiming,
    phase: Phase,
    value: ProgressValue,
    ticks: u32,
    tick_timer: Option<TickTimer>,
    redirect_timer: Option<RedirectTimer>,
    pending: Option<EncodedImage>,
}

impl ProgressSimulator {
    pub fn new(timing: ProgressTiming) -> Self {
        Self {
            timing,
            phase: Phase::Idle,
            value: ProgressValue::ZERO,
            ticks: 0,
            tick_timer: None,
            redirect_timer: None,
            pending: None,
        }
    }

    pub fn timing(&self) -> ProgressTiming {
        self.timing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn value(&self) -> ProgressValue {
        self.value
    }

    /// Ticks fired in the current cycle.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Whether any timer is armed.
    pub fn has_active_timer(&self) -> bool {
        self.tick_timer.is_some() || self.redirect_timer.is_some()
    }

    /// The earliest armed deadline, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.tick_timer, self.redirect_timer) {
            (Some(tick), _) => Some(tick.next_due),
            (None, Some(redirect)) => Some(redirect.due),
            (None, None) => None,
        }
    }

    /// Start a new cycle holding `image`. Any previous cycle is cancelled first.
    pub fn start(&mut self, image: EncodedImage, now: Instant) {
        self.cancel();
        self.phase = Phase::Running;
        self.pending = Some(image);
        self.tick_timer = Some(TickTimer {
            next_due: now + self.timing.interval,
        });
        log::debug!(
            "Progress: started, {} ticks expected",
            self.timing.ticks_to_complete()
        );
    }

    /// Drop both timers and the held image, back to `Idle`.
    ///
    /// Returns true if a timer was armed.
    pub fn cancel(&mut self) -> bool {
        let had_timer = self.tick_timer.take().is_some() | self.redirect_timer.take().is_some();
        if had_timer {
            log::debug!("Progress: cancelled in {:?} at {}%", self.phase, self.value.get());
        }
        self.pending = None;
        self.phase = Phase::Idle;
        self.value = ProgressValue::ZERO;
        self.ticks = 0;
        had_timer
    }

    /// Fire every timer due at `now`, in order.
    ///
    /// Returns the image when the redirect timer fires. This happens at most
    /// once per cycle.
    pub fn poll(&mut self, now: Instant) -> Option<EncodedImage> {
        while let Some(timer) = self.tick_timer {
            if timer.next_due > now {
                break;
            }
            self.fire_tick(timer.next_due);
        }

        let redirect = self.redirect_timer?;
        if redirect.due > now {
            return None;
        }
        self.redirect_timer = None;
        self.phase = Phase::Done;
        log::debug!("Progress: redirect delay elapsed");
        self.pending.take()
    }

    fn fire_tick(&mut self, fired_at: Instant) {
        self.value = self.value.advanced(self.timing.step);
        self.ticks += 1;
        log::trace!("Progress: tick {} -> {}%", self.ticks, self.value.get());

        if self.value.is_complete() {
            self.tick_timer = None;
            self.phase = Phase::Completing;
            self.redirect_timer = Some(RedirectTimer {
                due: fired_at + self.timing.redirect_delay,
            });
        } else {
            self.tick_timer = Some(TickTimer {
                next_due: fired_at + self.timing.interval,
            });
        }
    }
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new(ProgressTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn image() -> EncodedImage {
        EncodedImage::encode("image/png", &[1, 2, 3])
    }

    #[test]
    fn test_timing_math() {
        let timing = ProgressTiming::default();
        assert_eq!(timing.ticks_to_complete(), 10);
        assert_eq!(timing.time_to_done(), ms(1500));

        let uneven = ProgressTiming::new(ms(50), 30, ms(200));
        assert_eq!(uneven.ticks_to_complete(), 4);
        assert_eq!(uneven.time_to_done(), ms(400));

        assert_eq!(ProgressTiming::new(ms(1), 0, ms(0)).step, 1);
    }

    #[test]
    fn test_initial_state() {
        let sim = ProgressSimulator::default();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.value(), ProgressValue::ZERO);
        assert!(!sim.has_active_timer());
        assert!(sim.next_deadline().is_none());
    }

    #[test]
    fn test_default_scenario_timeline() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);
        assert_eq!(sim.phase(), Phase::Running);

        let mut last = 0;
        for tick in 1..=9u64 {
            assert!(sim.poll(t0 + ms(tick * 100)).is_none());
            assert!(sim.value().get() > last);
            last = sim.value().get();
            assert_eq!(sim.phase(), Phase::Running);
        }
        assert_eq!(sim.value().get(), 90);

        assert!(sim.poll(t0 + ms(1000)).is_none());
        assert_eq!(sim.ticks(), 10);
        assert_eq!(sim.value(), ProgressValue::COMPLETE);
        assert_eq!(sim.phase(), Phase::Completing);
        assert_eq!(sim.next_deadline(), Some(t0 + ms(1500)));

        assert!(sim.poll(t0 + ms(1499)).is_none());
        assert_eq!(sim.poll(t0 + ms(1500)), Some(image()));
        assert_eq!(sim.phase(), Phase::Done);
        assert!(!sim.has_active_timer());

        // Released exactly once
        assert!(sim.poll(t0 + ms(5000)).is_none());
        assert_eq!(sim.ticks(), 10);
    }

    #[test]
    fn test_poll_before_first_tick_does_nothing() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);
        assert!(sim.poll(t0 + ms(99)).is_none());
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.value(), ProgressValue::ZERO);
    }

    #[test]
    fn test_uneven_step_clamps_at_100() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::new(ProgressTiming::new(ms(10), 30, ms(20)));
        sim.start(image(), t0);

        let mut seen = Vec::new();
        for tick in 1..=4u64 {
            sim.poll(t0 + ms(tick * 10));
            seen.push(sim.value().get());
        }
        assert_eq!(seen, vec![30, 60, 90, 100]);
        assert_eq!(sim.phase(), Phase::Completing);
        assert_eq!(sim.poll(t0 + ms(60)), Some(image()));
    }

    #[test]
    fn test_late_poll_keeps_schedule() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);

        // One poll long after everything was due
        assert_eq!(sim.poll(t0 + ms(10_000)), Some(image()));
        assert_eq!(sim.ticks(), 10);
        assert_eq!(sim.phase(), Phase::Done);
    }

    #[test]
    fn test_late_poll_between_completion_and_redirect() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);

        // All ticks fire at once; the redirect stays anchored to the 10th tick
        assert!(sim.poll(t0 + ms(1200)).is_none());
        assert_eq!(sim.phase(), Phase::Completing);
        assert_eq!(sim.next_deadline(), Some(t0 + ms(1500)));
    }

    #[test]
    fn test_cancel_while_running() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);
        sim.poll(t0 + ms(300));
        assert_eq!(sim.value().get(), 30);

        assert!(sim.cancel());
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.value(), ProgressValue::ZERO);
        assert!(!sim.has_active_timer());
        assert!(sim.poll(t0 + ms(10_000)).is_none());
    }

    #[test]
    fn test_cancel_while_completing() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);
        sim.poll(t0 + ms(1000));
        assert_eq!(sim.phase(), Phase::Completing);

        assert!(sim.cancel());
        assert!(sim.poll(t0 + ms(10_000)).is_none());
        assert!(!sim.cancel());
    }

    #[test]
    fn test_restart_resets_value() {
        let t0 = Instant::now();
        let mut sim = ProgressSimulator::default();
        sim.start(image(), t0);
        sim.poll(t0 + ms(500));
        assert_eq!(sim.value().get(), 50);

        let t1 = t0 + ms(500);
        let second = EncodedImage::encode("image/jpeg", &[9]);
        sim.start(second.clone(), t1);
        assert_eq!(sim.value(), ProgressValue::ZERO);
        assert_eq!(sim.next_deadline(), Some(t1 + ms(100)));
        assert_eq!(sim.poll(t1 + ms(1500)), Some(second));
    }

    #[test]
    fn test_progress_value_clamps() {
        assert_eq!(ProgressValue::new(250).get(), 100);
        assert_eq!(ProgressValue::new(95).advanced(10).get(), 100);
        assert_eq!(ProgressValue::new(250).advanced(250).get(), 100);
    }
}
