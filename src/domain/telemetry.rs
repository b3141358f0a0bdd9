// Telemetry data domain models
use chrono::{DateTime, Local};
use std::collections::VecDeque;

use crate::domain::actuator::ActuatorState;

/// One numeric sample stamped with the local wall-clock time of receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub at: DateTime<Local>,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(at: DateTime<Local>, value: f64) -> Self {
        Self { at, value }
    }
}

/// Rolling window with a fixed capacity. Appending beyond capacity evicts
/// the oldest sample first; insertion order is chronological order.
#[derive(Debug, Clone)]
pub struct BoundedSeries<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedSeries<T> {
    /// A series with capacity 0 retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Up to `count` most recent samples, oldest first.
    pub fn latest(&self, count: usize) -> Vec<T>
    where
        T: Clone,
    {
        let skip = self.len().saturating_sub(count);
        self.samples.iter().skip(skip).cloned().collect()
    }
}

/// Latest reading of a numeric channel. `raw` tracks every arrival exactly
/// as delivered; `value` only advances when a payload parses as a float.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaugeReading {
    pub raw: Option<String>,
    pub value: Option<f64>,
}

impl GaugeReading {
    /// Record a newly arrived payload. Returns the parsed value when the
    /// payload is numeric (surrounding whitespace tolerated).
    pub fn record(&mut self, raw: &str) -> Result<f64, std::num::ParseFloatError> {
        self.raw = Some(raw.to_string());
        let value = raw.trim().parse::<f64>()?;
        self.value = Some(value);
        Ok(value)
    }
}

/// Whether the motion sensor currently reports presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Detected,
    NotDetected,
}

impl MotionState {
    /// The board publishes "1" for presence; anything else counts as clear.
    pub fn from_payload(payload: &str) -> Self {
        if payload == "1" {
            Self::Detected
        } else {
            Self::NotDetected
        }
    }
}

/// Latest known value per channel. Fields stay unset until the first
/// message arrives and are overwritten in place afterwards; history lives
/// in the bounded series, not here.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub temperature: GaugeReading,
    pub humidity: GaugeReading,
    pub motion: Option<MotionState>,
    pub distance: Option<String>,
    /// Timestamp reported by the board, kept verbatim. The chart axis uses
    /// receipt time instead (see the shared timeline series).
    pub reported_at: Option<String>,
    pub actuator: ActuatorState,
    pub actuator_raw: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_series_evicts_oldest() {
        let mut series = BoundedSeries::new(3);
        for n in 1..=5 {
            series.push(n);
        }

        assert_eq!(series.len(), 3);
        assert_eq!(series.latest(10), vec![3, 4, 5]);
    }

    #[test]
    fn test_bounded_series_latest_window() {
        let mut series = BoundedSeries::new(10);
        for n in 1..=4 {
            series.push(n);
        }

        assert_eq!(series.latest(2), vec![3, 4]);
        assert_eq!(series.latest(4), vec![1, 2, 3, 4]);
        assert_eq!(series.latest(100), vec![1, 2, 3, 4]);
        assert!(series.latest(0).is_empty());
    }

    #[test]
    fn test_bounded_series_zero_capacity_retains_nothing() {
        let mut series = BoundedSeries::new(0);
        series.push(1);

        assert!(series.is_empty());
        assert!(series.latest(5).is_empty());
    }

    #[test]
    fn test_gauge_record_parses_and_keeps_raw() {
        let mut gauge = GaugeReading::default();

        assert_eq!(gauge.record("21.5").ok(), Some(21.5));
        assert_eq!(gauge.raw.as_deref(), Some("21.5"));
        assert_eq!(gauge.value, Some(21.5));
    }

    #[test]
    fn test_gauge_record_tolerates_whitespace() {
        let mut gauge = GaugeReading::default();

        assert_eq!(gauge.record(" 19.25\n").ok(), Some(19.25));
        assert_eq!(gauge.raw.as_deref(), Some(" 19.25\n"));
    }

    #[test]
    fn test_gauge_record_failure_keeps_last_value() {
        let mut gauge = GaugeReading::default();
        gauge.record("21.5").ok();

        assert!(gauge.record("not-a-number").is_err());
        assert_eq!(gauge.raw.as_deref(), Some("not-a-number"));
        assert_eq!(gauge.value, Some(21.5));
    }

    #[test]
    fn test_motion_payload_mapping() {
        assert_eq!(MotionState::from_payload("1"), MotionState::Detected);
        assert_eq!(MotionState::from_payload("0"), MotionState::NotDetected);
        assert_eq!(MotionState::from_payload("yes"), MotionState::NotDetected);
        assert_eq!(MotionState::from_payload(""), MotionState::NotDetected);
    }

    #[test]
    fn test_snapshot_starts_unset() {
        let snapshot = TelemetrySnapshot::default();

        assert_eq!(snapshot.temperature, GaugeReading::default());
        assert!(snapshot.motion.is_none());
        assert!(snapshot.distance.is_none());
        assert!(snapshot.reported_at.is_none());
        assert_eq!(snapshot.actuator, ActuatorState::Unknown);
    }
}
