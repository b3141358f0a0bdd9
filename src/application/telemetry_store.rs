// Telemetry store - Latest snapshot and bounded rolling history
use crate::domain::actuator::{ActuatorCommand, ActuatorState};
use crate::domain::channel::SensorChannel;
use crate::domain::telemetry::{
    BoundedSeries, GaugeReading, MotionState, SeriesPoint, TelemetrySnapshot,
};
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};

const COMMAND_QUEUE: usize = 16;

struct StoreState {
    snapshot: TelemetrySnapshot,
    temperature: BoundedSeries<SeriesPoint>,
    humidity: BoundedSeries<SeriesPoint>,
    timeline: BoundedSeries<DateTime<Local>>,
}

/// Single authoritative holder of the latest sensor values and their rolling
/// history. Writers (the transport delivery task) and readers (the periodic
/// display refresh) go through one coarse lock; every operation is a short
/// synchronous critical section.
pub struct TelemetryStore {
    state: Mutex<StoreState>,
    commands: mpsc::Sender<ActuatorCommand>,
    actuator_watch: watch::Sender<ActuatorState>,
    accepting: AtomicBool,
}

impl TelemetryStore {
    /// Create a store whose numeric series and shared timeline each retain at
    /// most `capacity` samples. The returned receiver is the outbound command
    /// queue the transport drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ActuatorCommand>) {
        let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (actuator_watch, _) = watch::channel(ActuatorState::Unknown);

        let store = Self {
            state: Mutex::new(StoreState {
                snapshot: TelemetrySnapshot::default(),
                temperature: BoundedSeries::new(capacity),
                humidity: BoundedSeries::new(capacity),
                timeline: BoundedSeries::new(capacity),
            }),
            commands,
            actuator_watch,
            accepting: AtomicBool::new(true),
        };

        (store, command_rx)
    }

    /// Apply one delivered payload to the snapshot and, where the channel has
    /// one, its series. Malformed payloads never surface as errors: the raw
    /// text still lands in the snapshot and only the numeric history is left
    /// untouched. Ignored entirely once `shutdown` has been called.
    pub fn ingest(&self, channel: SensorChannel, payload: &str) {
        if !self.accepting.load(Ordering::SeqCst) {
            return;
        }

        let received_at = Local::now();
        let mut state = self.lock_state();

        match channel {
            SensorChannel::Temperature => {
                let StoreState {
                    snapshot,
                    temperature,
                    ..
                } = &mut *state;
                record_gauge(
                    &mut snapshot.temperature,
                    temperature,
                    channel,
                    payload,
                    received_at,
                );
            }
            SensorChannel::Humidity => {
                let StoreState {
                    snapshot, humidity, ..
                } = &mut *state;
                record_gauge(
                    &mut snapshot.humidity,
                    humidity,
                    channel,
                    payload,
                    received_at,
                );
            }
            SensorChannel::Motion => {
                state.snapshot.motion = Some(MotionState::from_payload(payload));
            }
            SensorChannel::Distance => {
                state.snapshot.distance = Some(payload.to_string());
            }
            SensorChannel::Timestamp => {
                // The chart axis tracks receipt time, not the board's clock.
                state.snapshot.reported_at = Some(payload.to_string());
                state.timeline.push(received_at);
            }
            SensorChannel::ActuatorStatus => {
                state.snapshot.actuator_raw = Some(payload.to_string());
                match ActuatorState::from_status(payload) {
                    Some(reported) => {
                        if state.snapshot.actuator != reported {
                            state.snapshot.actuator = reported;
                            self.actuator_watch.send_replace(reported);
                        }
                    }
                    None => {
                        tracing::debug!("ignoring unrecognized actuator status {:?}", payload);
                    }
                }
            }
        }
    }

    /// Read-only copy of the latest values.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.lock_state().snapshot.clone()
    }

    /// Up to `count` most recent samples for a numeric channel, oldest first.
    /// Channels without a series yield an empty sequence.
    pub fn recent_series(&self, channel: SensorChannel, count: usize) -> Vec<SeriesPoint> {
        let state = self.lock_state();
        match channel {
            SensorChannel::Temperature => state.temperature.latest(count),
            SensorChannel::Humidity => state.humidity.latest(count),
            _ => Vec::new(),
        }
    }

    /// Receipt times shared by all numeric channels, oldest first.
    pub fn recent_timeline(&self, count: usize) -> Vec<DateTime<Local>> {
        self.lock_state().timeline.latest(count)
    }

    /// Queue an actuator command for the transport to publish. Fire and
    /// forget: the actuator field only moves when a status report comes back
    /// in, never from the command itself.
    pub fn submit_command(&self, command: ActuatorCommand) {
        if !self.accepting.load(Ordering::SeqCst) {
            return;
        }

        if let Err(error) = self.commands.try_send(command) {
            tracing::warn!("dropping actuator command: {}", error);
        }
    }

    /// Watch actuator transitions without polling. The receiver starts on the
    /// current state and wakes once per change, skipping repeats.
    pub fn actuator_changes(&self) -> watch::Receiver<ActuatorState> {
        self.actuator_watch.subscribe()
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Stop accepting ingests and commands. Reads keep working so a final
    /// redraw can complete.
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::SeqCst);
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        // A panic mid-update cannot leave a half-written sample, so a
        // poisoned lock is still safe to read and write.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn record_gauge(
    gauge: &mut GaugeReading,
    series: &mut BoundedSeries<SeriesPoint>,
    channel: SensorChannel,
    payload: &str,
    received_at: DateTime<Local>,
) {
    match gauge.record(payload) {
        Ok(value) => series.push(SeriesPoint::new(received_at, value)),
        Err(error) => {
            tracing::debug!(
                "skipping non-numeric {} sample {:?}: {}",
                channel, payload, error
            );
        }
    }
}
