//! L4 Atomic Layer: Time bookkeeping for one item's timeline
//!
//! Provides the `TimeRecorder` plus pure helpers for progress and
//! interpolation.

use std::time::Duration;

use tokio::time::Instant;

/// Calculate transition progress (0.0 to 1.0) at `now`
///
/// # Arguments
/// * `start` - Transition start time
/// * `duration` - Total transition duration
/// * `now` - Sampling instant
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Scale a duration by a float factor without panicking on
/// negative or non-finite results (those collapse to zero)
#[inline]
pub fn scale_duration(duration: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(Duration::ZERO)
}

/// Wall-clock bookkeeping for one item's timeline
///
/// `prev_pause_time` is `Some` exactly while the item is paused, and
/// `pause_time` only grows, when a pause ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRecorder {
    start_time: Option<Instant>,
    pause_time: Duration,
    prev_pause_time: Option<Instant>,
}

impl TimeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn start_time(&self) -> Option<Instant> {
        self.start_time
    }

    /// Cumulative paused duration
    #[inline]
    pub fn pause_time(&self) -> Duration {
        self.pause_time
    }

    /// When the current pause began
    #[inline]
    pub fn prev_pause_time(&self) -> Option<Instant> {
        self.prev_pause_time
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.prev_pause_time.is_some()
    }

    /// Begin a fresh timeline at `now`
    pub fn start(&mut self, now: Instant) {
        *self = Self {
            start_time: Some(now),
            ..Self::default()
        };
    }

    pub fn begin_pause(&mut self, now: Instant) {
        if self.prev_pause_time.is_none() {
            self.prev_pause_time = Some(now);
        }
    }

    pub fn end_pause(&mut self, now: Instant) {
        if let Some(began) = self.prev_pause_time.take() {
            self.pause_time += now.saturating_duration_since(began);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Time spent moving, frozen while paused. `None` before `start`.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        let start = self.start_time?;
        let current = self.prev_pause_time.unwrap_or(now);
        Some(
            current
                .saturating_duration_since(start)
                .saturating_sub(self.pause_time),
        )
    }

    /// Fraction of `actual_duration` traveled at `now`
    ///
    /// Not clamped: it may exceed 1 before the end is reported, and a zero
    /// `actual_duration` yields a non-finite value.
    pub fn move_percent(&self, now: Instant, actual_duration: Duration) -> f64 {
        match self.elapsed(now) {
            Some(elapsed) => elapsed.as_secs_f64() / actual_duration.as_secs_f64(),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(-50.0, 50.0, 1.0) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_progress() {
        let start = Instant::now();
        assert!((progress(start, Duration::ZERO, start) - 1.0).abs() < 0.001);
        assert!((progress(start, ms(1000), start + ms(250)) - 0.25).abs() < 0.001);
        assert!((progress(start, ms(1000), start + ms(5000)) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_scale_duration() {
        assert_eq!(scale_duration(ms(5000), 0.5), ms(2500));
        assert_eq!(scale_duration(ms(5000), -1.0), Duration::ZERO);
        assert_eq!(scale_duration(ms(5000), f64::NAN), Duration::ZERO);
    }

    #[test]
    fn test_recorder_not_started() {
        let recorder = TimeRecorder::new();
        assert_eq!(recorder.elapsed(Instant::now()), None);
        assert_eq!(recorder.move_percent(Instant::now(), ms(1000)), 0.0);
    }

    #[test]
    fn test_recorder_excludes_paused_time() {
        let t0 = Instant::now();
        let mut recorder = TimeRecorder::new();
        recorder.start(t0);

        recorder.begin_pause(t0 + ms(1000));
        assert!(recorder.is_paused());
        // Frozen while paused
        assert_eq!(recorder.elapsed(t0 + ms(4000)), Some(ms(1000)));

        recorder.end_pause(t0 + ms(3000));
        assert!(!recorder.is_paused());
        assert_eq!(recorder.pause_time(), ms(2000));
        assert_eq!(recorder.elapsed(t0 + ms(4000)), Some(ms(2000)));
        assert!((recorder.move_percent(t0 + ms(4000), ms(4000)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_recorder_start_clears_previous_timeline() {
        let t0 = Instant::now();
        let mut recorder = TimeRecorder::new();
        recorder.start(t0);
        recorder.begin_pause(t0 + ms(10));
        recorder.end_pause(t0 + ms(20));

        recorder.start(t0 + ms(100));
        assert_eq!(recorder.pause_time(), Duration::ZERO);
        assert_eq!(recorder.prev_pause_time(), None);
        assert_eq!(recorder.start_time(), Some(t0 + ms(100)));

        recorder.clear();
        assert_eq!(recorder, TimeRecorder::default());
    }

    #[test]
    fn test_zero_duration_is_not_finite() {
        let t0 = Instant::now();
        let mut recorder = TimeRecorder::new();
        recorder.start(t0);
        assert!(!recorder.move_percent(t0, Duration::ZERO).is_finite());
    }
}
