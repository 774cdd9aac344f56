use crate::stopwatch::format::{format_duration, serialize_millis};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lap {
    pub number: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    #[serde(rename = "split_ms", serialize_with = "serialize_millis")]
    pub split: Duration,
}

impl Lap {
    pub fn display_time(&self) -> String {
        format_duration(self.elapsed)
    }

    pub fn split_time(&self) -> String {
        format_duration(self.split)
    }
}

impl Display for Lap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lap {}", self.number)
    }
}

/// Recorded laps with the fastest and slowest tracked as they arrive.
///
/// Laps are kept oldest-first internally and handed out most-recent-first.
#[derive(Debug, Default, Clone)]
pub struct Laps {
    laps: Vec<Lap>,
    fastest: Option<usize>,
    slowest: Option<usize>,
}

impl Laps {
    pub fn record(&mut self, elapsed: Duration) -> Lap {
        let previous = self.laps.last().map(|lap| lap.elapsed).unwrap_or_default();
        let lap = Lap {
            number: self.laps.len() + 1,
            elapsed,
            split: elapsed.saturating_sub(previous),
        };
        let index = self.laps.len();

        self.laps.push(lap);

        // Ties keep the earlier lap.
        if self.fastest().map_or(true, |fastest| elapsed < fastest.elapsed) {
            self.fastest = Some(index);
        }
        if self.slowest().map_or(true, |slowest| elapsed > slowest.elapsed) {
            self.slowest = Some(index);
        }

        lap
    }

    pub fn clear(&mut self) {
        self.laps.clear();
        self.fastest = None;
        self.slowest = None;
    }

    /// Most recent lap first.
    pub fn iter(&self) -> impl Iterator<Item = &Lap> {
        self.laps.iter().rev()
    }

    pub fn fastest(&self) -> Option<&Lap> {
        self.fastest.and_then(|index| self.laps.get(index))
    }

    pub fn slowest(&self) -> Option<&Lap> {
        self.slowest.and_then(|index| self.laps.get(index))
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }
}
