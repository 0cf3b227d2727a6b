//! Sustained-low threshold monitor
//!
//! A pure state machine over the stream of readings. It tracks one episode at
//! a time: a continuous run of below-threshold samples. Once the run has
//! lasted at least the debounce window the monitor fires, and it will not
//! fire again until a reading at or above the threshold closes the episode.
//! All timing is tick arithmetic injected by the caller, so the machine is
//! fully testable without a clock.

use crate::domain::{Celsius, Reading, Tick};
use std::time::Duration;

/// In-progress below-threshold run
///
/// Created once at process start, mutated once per sample tick, never
/// destroyed. `alert_fired` implies `started_at` is set and the elapsed
/// duration at fire time was at least the debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdEpisode {
    /// Tick of the first below-threshold reading in the current run
    pub started_at: Option<Tick>,
    /// Whether the alert for the current run has already fired
    pub alert_fired: bool,
}

impl ThresholdEpisode {
    /// Clear the episode; both fields reset in the same tick
    fn reset(&mut self) {
        self.started_at = None;
        self.alert_fired = false;
    }
}

/// Outcome of evaluating one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// Nothing to announce this tick
    Hold,
    /// The sustained-low condition was just confirmed; publish the alert
    Fire,
}

/// Debounced threshold-crossing monitor
#[derive(Debug)]
pub struct ThresholdMonitor {
    threshold: Celsius,
    debounce: Duration,
    episode: ThresholdEpisode,
}

impl ThresholdMonitor {
    /// Create a monitor with the given threshold and debounce window
    pub fn new(threshold: Celsius, debounce: Duration) -> Self {
        Self {
            threshold,
            debounce,
            episode: ThresholdEpisode::default(),
        }
    }

    /// The configured threshold
    pub fn threshold(&self) -> Celsius {
        self.threshold
    }

    /// Current episode state
    pub fn episode(&self) -> &ThresholdEpisode {
        &self.episode
    }

    /// Evaluate one reading
    ///
    /// At most one `Fire` is produced per unbroken below-threshold run; a
    /// reading at or above the threshold resets the episode and re-arms the
    /// alert. A reading exactly at the threshold counts as not below, and an
    /// elapsed time exactly equal to the window counts as elapsed enough.
    pub fn evaluate(&mut self, reading: Reading) -> AlertDecision {
        if !reading.celsius.is_below(self.threshold) {
            self.episode.reset();
            return AlertDecision::Hold;
        }

        let started = *self.episode.started_at.get_or_insert(reading.tick);
        let elapsed = reading.tick.millis_since(started);

        if elapsed >= self.debounce.as_millis() as u64 && !self.episode.alert_fired {
            self.episode.alert_fired = true;
            log::warn!(
                "Temperature below {} for {}ms, raising alert",
                self.threshold,
                elapsed
            );
            return AlertDecision::Fire;
        }

        AlertDecision::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 31.0;
    const WINDOW_MS: u64 = 60_000;

    fn monitor() -> ThresholdMonitor {
        ThresholdMonitor::new(Celsius::new(THRESHOLD), Duration::from_millis(WINDOW_MS))
    }

    fn eval(m: &mut ThresholdMonitor, degrees: f64, tick_ms: u64) -> AlertDecision {
        m.evaluate(Reading::new(Celsius::new(degrees), Tick::from_millis(tick_ms)))
    }

    #[test]
    fn test_never_fires_at_or_above_threshold() {
        let mut m = monitor();
        for (i, degrees) in [31.0, 35.5, 31.0, 90.0, 31.01].iter().enumerate() {
            assert_eq!(eval(&mut m, *degrees, i as u64 * 5000), AlertDecision::Hold);
        }
        assert_eq!(m.episode().started_at, None);
    }

    #[test]
    fn test_fires_exactly_at_window_boundary() {
        let mut m = monitor();
        assert_eq!(eval(&mut m, 30.0, 0), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 59_999), AlertDecision::Hold);

        let mut m = monitor();
        assert_eq!(eval(&mut m, 30.0, 0), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 60_000), AlertDecision::Fire);
    }

    #[test]
    fn test_single_long_run_fires_once() {
        let mut m = monitor();
        let mut fires = 0;
        for tick in (0..300_000).step_by(5000) {
            if eval(&mut m, 29.5, tick) == AlertDecision::Fire {
                fires += 1;
            }
        }
        assert_eq!(fires, 1);
        assert!(m.episode().alert_fired);
    }

    #[test]
    fn test_refires_after_reset() {
        let mut m = monitor();
        assert_eq!(eval(&mut m, 30.0, 0), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 60_000), AlertDecision::Fire);

        // Recovery closes the episode and re-arms the alert
        assert_eq!(eval(&mut m, 32.0, 65_000), AlertDecision::Hold);
        assert_eq!(m.episode().started_at, None);
        assert!(!m.episode().alert_fired);

        // A second sustained run fires exactly once more
        assert_eq!(eval(&mut m, 30.0, 70_000), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 130_000), AlertDecision::Fire);
        assert_eq!(eval(&mut m, 30.0, 190_000), AlertDecision::Hold);
    }

    #[test]
    fn test_short_dip_never_fires() {
        let mut m = monitor();
        assert_eq!(eval(&mut m, 30.0, 0), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 30_000), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 31.5, 35_000), AlertDecision::Hold);
        // The dip reset the clock; a fresh run must last the full window
        assert_eq!(eval(&mut m, 30.0, 40_000), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 95_000), AlertDecision::Hold);
        assert_eq!(eval(&mut m, 30.0, 100_000), AlertDecision::Fire);
    }

    #[test]
    fn test_startup_reading_at_threshold_starts_no_episode() {
        let mut m = monitor();
        assert_eq!(eval(&mut m, THRESHOLD, 0), AlertDecision::Hold);
        assert_eq!(m.episode().started_at, None);
        assert!(!m.episode().alert_fired);
    }

    #[test]
    fn test_fired_implies_started() {
        let mut m = monitor();
        for tick in (0..200_000).step_by(5000) {
            eval(&mut m, 28.0, tick);
            if m.episode().alert_fired {
                assert!(m.episode().started_at.is_some());
            }
        }
    }
}
