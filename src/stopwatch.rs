use crate::stopwatch::format::{format_duration, serialize_millis};
use crate::stopwatch::lap::{Lap, Laps};
use serde::Serialize;
use std::time::{Duration, Instant};

pub mod format;
pub mod lap;

/// Which branch the dual-purpose lap/reset command took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapOrReset {
    Lap(usize),
    Reset,
}

/// Elapsed time plus lap history.
///
/// Every operation takes the current instant so callers decide where time comes from.
/// While running, `elapsed = now - anchor` where `anchor = started - banked`.
#[derive(Debug, Default, Clone)]
pub struct Stopwatch {
    started: Option<Instant>,
    banked: Duration,
    elapsed: Duration,
    laps: Laps,
}

impl Stopwatch {
    pub fn start(&mut self, now: Instant) -> bool {
        if self.started.is_some() {
            return false;
        }

        self.banked = self.elapsed;
        self.started = Some(now);
        true
    }

    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.tick(now) {
            return false;
        }

        self.started = None;
        self.banked = self.elapsed;
        true
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        match self.started {
            Some(started) => {
                let elapsed = self.banked + now.saturating_duration_since(started);
                self.elapsed = self.elapsed.max(elapsed);
                true
            }
            None => false,
        }
    }

    pub fn lap_or_reset(&mut self, now: Instant) -> LapOrReset {
        match self.record_lap(now) {
            Some(lap) => LapOrReset::Lap(lap.number),
            None => {
                self.reset();
                LapOrReset::Reset
            }
        }
    }

    fn record_lap(&mut self, now: Instant) -> Option<Lap> {
        if !self.tick(now) {
            return None;
        }

        Some(self.laps.record(self.elapsed))
    }

    pub fn reset(&mut self) {
        self.started = None;
        self.banked = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.laps.clear();
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn anchor(&self) -> Option<Instant> {
        self.started
            .and_then(|started| started.checked_sub(self.banked))
    }

    /// True when a reset would change nothing.
    pub fn is_zeroed(&self) -> bool {
        self.started.is_none() && self.elapsed.is_zero() && self.laps.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elapsed: self.elapsed,
            readout: format_duration(self.elapsed),
            running: self.is_running(),
            laps: self.laps.iter().copied().collect(),
            fastest_lap: self.laps.fastest().map(|lap| lap.number),
            slowest_lap: self.laps.slowest().map(|lap| lap.number),
            fastest_lap_key: self.laps.fastest().map(Lap::display_time),
            slowest_lap_key: self.laps.slowest().map(Lap::display_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Fastest,
    Slowest,
}

/// Point-in-time copy of a [`Stopwatch`] handed to presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub readout: String,
    pub running: bool,
    /// Most recent lap first.
    pub laps: Vec<Lap>,
    pub fastest_lap: Option<usize>,
    pub slowest_lap: Option<usize>,
    pub fastest_lap_key: Option<String>,
    pub slowest_lap_key: Option<String>,
}

impl Snapshot {
    /// A lap that is both fastest and slowest is shown as the slowest.
    pub fn highlight(&self, lap: &Lap) -> Option<Highlight> {
        if self.slowest_lap == Some(lap.number) {
            Some(Highlight::Slowest)
        } else if self.fastest_lap == Some(lap.number) {
            Some(Highlight::Fastest)
        } else {
            None
        }
    }

    /// True unless `next` only moved the elapsed time forward.
    pub fn differs_beyond_tick(&self, next: &Snapshot) -> bool {
        self.running != next.running || self.laps != next.laps || next.elapsed < self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn starts_zeroed() {
        let stopwatch = Stopwatch::default();
        let snapshot = stopwatch.snapshot();

        assert_eq!(snapshot.elapsed, Duration::ZERO);
        assert_eq!(snapshot.readout, "00:00.00");
        assert!(!snapshot.running);
        assert!(snapshot.laps.is_empty());
        assert_eq!(snapshot.fastest_lap_key, None);
        assert_eq!(snapshot.slowest_lap_key, None);
        assert_eq!(stopwatch.anchor(), None);
    }

    #[test]
    fn start_twice_keeps_the_anchor() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        assert!(stopwatch.start(t0));
        let anchor = stopwatch.anchor();
        assert!(!stopwatch.start(t0 + ms(250)));

        assert!(stopwatch.is_running());
        assert_eq!(stopwatch.anchor(), anchor);
        assert_eq!(anchor, Some(t0));
    }

    #[test]
    fn tick_measures_from_anchor() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        assert!(stopwatch.tick(t0 + ms(1_230)));

        assert_eq!(stopwatch.elapsed(), ms(1_230));
    }

    #[test]
    fn tick_while_stopped_is_ignored() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        assert!(!stopwatch.tick(t0 + ms(500)));
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_never_goes_backwards() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        stopwatch.tick(t0 + ms(400));
        stopwatch.tick(t0 + ms(100));

        assert_eq!(stopwatch.elapsed(), ms(400));
    }

    #[test]
    fn stop_freezes_and_restart_resumes() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        assert!(stopwatch.stop(t0 + ms(1_000)));
        assert!(!stopwatch.tick(t0 + ms(5_000)));
        assert_eq!(stopwatch.elapsed(), ms(1_000));

        stopwatch.start(t0 + ms(5_000));
        assert_eq!(stopwatch.anchor(), Some(t0 + ms(4_000)));
        stopwatch.tick(t0 + ms(5_500));

        assert_eq!(stopwatch.elapsed(), ms(1_500));
    }

    #[test]
    fn stop_while_stopped_changes_nothing() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        stopwatch.lap_or_reset(t0 + ms(300));
        stopwatch.stop(t0 + ms(600));
        let before = stopwatch.snapshot();

        assert!(!stopwatch.stop(t0 + ms(900)));
        assert_eq!(stopwatch.snapshot(), before);
    }

    #[test]
    fn lap_while_running_records() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        assert_eq!(stopwatch.lap_or_reset(t0 + ms(1_500)), LapOrReset::Lap(1));

        let snapshot = stopwatch.snapshot();
        assert!(snapshot.running);
        assert_eq!(snapshot.elapsed, ms(1_500));
        assert_eq!(snapshot.laps.len(), 1);
        assert_eq!(snapshot.laps[0].display_time(), "00:01.50");
        assert_eq!(snapshot.fastest_lap_key.as_deref(), Some("00:01.50"));
        assert_eq!(snapshot.slowest_lap_key.as_deref(), Some("00:01.50"));
    }

    #[test]
    fn lap_while_stopped_resets() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        stopwatch.lap_or_reset(t0 + ms(200));
        stopwatch.stop(t0 + ms(700));

        assert_eq!(stopwatch.lap_or_reset(t0 + ms(900)), LapOrReset::Reset);

        let snapshot = stopwatch.snapshot();
        assert_eq!(snapshot.elapsed, Duration::ZERO);
        assert!(snapshot.laps.is_empty());
        assert_eq!(snapshot.fastest_lap_key, None);
        assert_eq!(snapshot.slowest_lap_key, None);
        assert!(!snapshot.running);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut stopwatch = Stopwatch::default();

        stopwatch.reset();
        stopwatch.reset();

        assert!(stopwatch.is_zeroed());
        assert_eq!(stopwatch.snapshot(), Stopwatch::default().snapshot());
    }

    #[test]
    fn stopped_time_is_not_zeroed() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        assert!(!stopwatch.is_zeroed());
        stopwatch.stop(t0 + ms(250));
        assert!(!stopwatch.is_zeroed());

        stopwatch.lap_or_reset(t0 + ms(300));
        assert!(stopwatch.is_zeroed());
    }

    #[test]
    fn reset_counts_as_more_than_a_tick() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        let started = stopwatch.snapshot();
        stopwatch.tick(t0 + ms(40));
        let ticked = stopwatch.snapshot();
        stopwatch.stop(t0 + ms(80));
        let stopped = stopwatch.snapshot();
        stopwatch.reset();
        let reset = stopwatch.snapshot();

        assert!(!started.differs_beyond_tick(&ticked));
        assert!(ticked.differs_beyond_tick(&stopped));
        assert!(stopped.differs_beyond_tick(&reset));
    }

    #[test]
    fn highlight_prefers_slowest_when_shared() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        stopwatch.lap_or_reset(t0 + ms(100));
        let snapshot = stopwatch.snapshot();
        assert_eq!(snapshot.highlight(&snapshot.laps[0]), Some(Highlight::Slowest));

        stopwatch.lap_or_reset(t0 + ms(300));
        let snapshot = stopwatch.snapshot();
        assert_eq!(snapshot.highlight(&snapshot.laps[0]), Some(Highlight::Slowest));
        assert_eq!(snapshot.highlight(&snapshot.laps[1]), Some(Highlight::Fastest));
    }

    #[test]
    fn snapshot_serializes_millis() {
        let t0 = Instant::now();
        let mut stopwatch = Stopwatch::default();

        stopwatch.start(t0);
        stopwatch.lap_or_reset(t0 + ms(1_250));
        let json = serde_json::to_value(stopwatch.snapshot()).unwrap();

        assert_eq!(json["elapsed_ms"], 1_250);
        assert_eq!(json["readout"], "00:01.25");
        assert_eq!(json["laps"][0]["number"], 1);
        assert_eq!(json["laps"][0]["split_ms"], 1_250);
        assert_eq!(json["fastest_lap_key"], "00:01.25");
    }
}
