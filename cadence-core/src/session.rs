//! # Recording Session Module
//!
//! Data model for one contiguous recording interval and the conversion
//! from inter-tap intervals to a rolling-average BPM. The state machine
//! in `tracker` stays a thin shell around this module.

use std::time::Instant;

use crate::config::TrackerSettings;

/// Number of taps that make up one beat.
///
/// Fixed domain convention, asserted rather than derived from any
/// measured signal: four taps (e.g. sixteenth notes) per beat, so a tap
/// rate of 1/s reads as 15 BPM.
pub const TAPS_PER_BEAT: f64 = 4.0;

/// One labeled entry of the sample log.
///
/// Immutable once appended; insertion order is time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// 0-based insertion order within the session.
    pub index: usize,
    /// Milliseconds since the session started (monotonic clock).
    pub elapsed_ms: f64,
    /// Rolling-average BPM at this tap.
    pub bpm: f64,
    /// Identifier of the key that produced the tap.
    pub key: u32,
}

/// One recording session, from begin to end.
///
/// The session exclusively owns its raw events and its sample log; only
/// the tracker mutates it. The settings in force are copied in at
/// creation and held fixed for the session's duration.
#[derive(Debug)]
pub struct Session {
    start: Instant,
    window: usize,
    target_taps: u32,
    raw_events: Vec<(Instant, u32)>,
    samples: Vec<Sample>,
}

impl Session {
    pub fn new(start: Instant, settings: &TrackerSettings) -> Self {
        Self {
            start,
            window: settings.window,
            target_taps: settings.target_taps,
            raw_events: Vec::new(),
            samples: Vec::new(),
        }
    }

    /// Appends one qualifying tap and, once enough interval history
    /// exists, the derived sample.
    ///
    /// The first two taps never produce a sample: a single interval is
    /// not comparable to a window, so at least two are required before
    /// the rolling mean is defined. A degenerate (zero) average interval
    /// produces no sample either, keeping `NaN`/`Inf` out of the log.
    pub fn record_tap(&mut self, now: Instant, key: u32) -> Option<&Sample> {
        self.raw_events.push((now, key));
        let n = self.raw_events.len();
        if n < 3 {
            return None;
        }

        let avg_interval = self.average_interval();
        if avg_interval <= 0.0 {
            eprintln!("[SESSION] Zero interval at tap {n}, sample discarded");
            return None;
        }

        let taps_per_second = 1.0 / avg_interval;
        let bpm = (60.0 / TAPS_PER_BEAT) * taps_per_second;
        self.samples.push(Sample {
            index: self.samples.len(),
            elapsed_ms: 1000.0 * now.duration_since(self.start).as_secs_f64(),
            bpm,
            key,
        });
        self.samples.last()
    }

    /// Mean of the most recent inter-tap intervals: the newest interval
    /// is excluded as a boundary artifact and up to `window` of the
    /// preceding ones are averaged (fewer early in the session).
    fn average_interval(&self) -> f64 {
        let intervals: Vec<f64> = self
            .raw_events
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0).as_secs_f64())
            .collect();

        let end = intervals.len() - 1;
        let start = end.saturating_sub(self.window);
        let slice = &intervals[start..end];
        slice.iter().sum::<f64>() / slice.len() as f64
    }

    pub fn tap_count(&self) -> usize {
        self.raw_events.len()
    }

    /// Whether the configured tap-count target has been reached.
    /// A target of 0 means unlimited and never triggers.
    pub fn target_reached(&self) -> bool {
        self.target_taps > 0 && self.raw_events.len() as u32 >= self.target_taps
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(window: usize) -> TrackerSettings {
        TrackerSettings {
            target_taps: 0,
            window,
        }
    }

    /// Feeds taps separated by the given intervals (seconds) through a
    /// fresh session and returns it. The first tap lands at t=0.
    fn tap_intervals(window: usize, intervals: &[f64]) -> Session {
        let start = Instant::now();
        let mut session = Session::new(start, &settings(window));
        let mut t = start;
        session.record_tap(t, 65);
        for (i, dt) in intervals.iter().enumerate() {
            t += Duration::from_secs_f64(*dt);
            session.record_tap(t, 65 + (i as u32 % 2));
        }
        session
    }

    #[test]
    fn first_two_taps_produce_no_sample() {
        let session = tap_intervals(10, &[0.5]);
        assert_eq!(session.tap_count(), 2);
        assert!(session.samples().is_empty());
    }

    #[test]
    fn sample_count_trails_raw_events_by_two() {
        let session = tap_intervals(10, &[0.5, 0.5, 0.5, 0.5]);
        assert_eq!(session.tap_count(), 5);
        assert_eq!(session.samples().len(), 3);
    }

    #[test]
    fn samples_are_labeled_in_insertion_order() {
        let session = tap_intervals(10, &[0.4, 0.3, 0.5, 0.2, 0.6]);
        for (i, sample) in session.samples().iter().enumerate() {
            assert_eq!(sample.index, i);
        }
    }

    #[test]
    fn elapsed_ms_is_non_decreasing() {
        let session = tap_intervals(10, &[0.4, 0.3, 0.5, 0.2, 0.6]);
        let samples = session.samples();
        for pair in samples.windows(2) {
            assert!(pair[1].elapsed_ms >= pair[0].elapsed_ms);
        }
    }

    #[test]
    fn periodic_taps_at_half_second_read_thirty_bpm() {
        // Taps at t = 0.0, 0.5, 1.0, 1.5, 2.0 with W = 10: the first
        // sample appears at the 3rd tap with an average interval of 0.5s,
        // i.e. 15 / 0.5 = 30 BPM.
        let session = tap_intervals(10, &[0.5, 0.5, 0.5, 0.5]);
        let first = &session.samples()[0];
        assert!((first.elapsed_ms - 1000.0).abs() < 1.0);
        assert!((first.bpm - 30.0).abs() < 1e-6);
        for sample in session.samples() {
            assert!((sample.bpm - 30.0).abs() < 1e-6);
        }
    }

    #[test]
    fn periodic_convergence_is_independent_of_window_size() {
        let intervals = [0.25; 12];
        for window in [2, 4, 8] {
            let session = tap_intervals(window, &intervals);
            let last = session.last_sample().unwrap();
            assert!((last.bpm - 15.0 / 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn alternating_taps_stabilize_with_even_window() {
        // Two-handed tapping: intervals alternate 1.0s / 0.5s. An even
        // window always averages whole pairs, so the reading settles at
        // 15 / 0.75 = 20 BPM.
        let intervals = [1.0, 0.5, 1.0, 0.5, 1.0, 0.5, 1.0, 0.5, 1.0, 0.5];
        let session = tap_intervals(4, &intervals);
        let samples = session.samples();
        let settled = &samples[4..];
        for sample in settled {
            assert!((sample.bpm - 20.0).abs() < 1e-6, "bpm = {}", sample.bpm);
        }
    }

    #[test]
    fn alternating_taps_oscillate_with_odd_window() {
        // Same tapping pattern through an odd window: consecutive means
        // see 3 long + 2 short vs. 2 long + 3 short intervals, so the
        // reading flips between two values forever.
        let intervals = [1.0, 0.5, 1.0, 0.5, 1.0, 0.5, 1.0, 0.5, 1.0, 0.5];
        let session = tap_intervals(5, &intervals);
        let samples = session.samples();
        let settled = &samples[5..];
        for pair in settled.windows(2) {
            assert!(
                (pair[0].bpm - pair[1].bpm).abs() > 0.5,
                "expected oscillation, got {} then {}",
                pair[0].bpm,
                pair[1].bpm
            );
        }
    }

    #[test]
    fn zero_interval_discards_the_sample() {
        let start = Instant::now();
        let mut session = Session::new(start, &settings(10));
        // Two taps on the same instant, then a third: the only usable
        // interval is zero, so no sample may be recorded.
        session.record_tap(start, 65);
        session.record_tap(start, 66);
        session.record_tap(start + Duration::from_millis(500), 65);
        assert_eq!(session.tap_count(), 3);
        assert!(session.samples().is_empty());

        // Once real intervals dominate, sampling resumes and every value
        // is finite.
        let mut t = start + Duration::from_millis(500);
        for _ in 0..6 {
            t += Duration::from_millis(500);
            session.record_tap(t, 66);
        }
        assert!(!session.samples().is_empty());
        for sample in session.samples() {
            assert!(sample.bpm.is_finite());
        }
    }
}
