// Console presentation - Periodic status view and operator prompt
use crate::application::telemetry_store::TelemetryStore;
use crate::domain::actuator::ActuatorCommand;
use crate::domain::channel::SensorChannel;
use crate::domain::telemetry::{MotionState, SeriesPoint, TelemetrySnapshot};
use crate::infrastructure::config::ConsoleSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Poll the store on a fixed cadence and log the current readings, echo
/// actuator transitions as they are reported, and read open/close commands
/// from stdin. Exits once the store stops accepting writes.
pub async fn run(store: Arc<TelemetryStore>, settings: ConsoleSettings) {
    let mut refresh = tokio::time::interval(Duration::from_secs(settings.refresh_secs.max(1)));
    let mut actuator = store.actuator_changes();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prompt_open = true;

    tracing::info!("type open or close to drive the actuator");

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                if !store.is_accepting() {
                    break;
                }
                tracing::info!("{}", render_status(&store.snapshot()));
                tracing::debug!("{}", render_window(&store, settings.window));
            }
            changed = actuator.changed() => match changed {
                Ok(()) => {
                    let state = *actuator.borrow_and_update();
                    tracing::info!("actuator reported {}", state);
                }
                Err(_) => break,
            },
            line = lines.next_line(), if prompt_open => match line {
                Ok(Some(line)) => submit(&store, &line),
                Ok(None) | Err(_) => prompt_open = false,
            },
        }
    }

    tracing::debug!("console loop stopped");
}

fn submit(store: &TelemetryStore, line: &str) {
    if line.trim().is_empty() {
        return;
    }

    match line.parse::<ActuatorCommand>() {
        Ok(command) => {
            tracing::info!("queueing actuator command {}", command);
            store.submit_command(command);
        }
        Err(error) => tracing::warn!("{}", error),
    }
}

/// One status line per refresh, raw values as delivered with N/A for
/// channels that have not reported yet.
fn render_status(snapshot: &TelemetrySnapshot) -> String {
    let motion = match snapshot.motion {
        Some(MotionState::Detected) => "yes",
        Some(MotionState::NotDetected) => "no",
        None => "N/A",
    };

    format!(
        "temperature {} °C | humidity {} % | motion {} | distance {} cm | reported {} | actuator {}",
        snapshot.temperature.raw.as_deref().unwrap_or("N/A"),
        snapshot.humidity.raw.as_deref().unwrap_or("N/A"),
        motion,
        snapshot.distance.as_deref().unwrap_or("N/A"),
        snapshot.reported_at.as_deref().unwrap_or("N/A"),
        snapshot.actuator,
    )
}

/// Numbers-only stand-in for the chart: per-trace counts, the newest
/// sample of each trace and the newest shared-axis tick.
fn render_window(store: &TelemetryStore, window: usize) -> String {
    let temperature = store.recent_series(SensorChannel::Temperature, window);
    let humidity = store.recent_series(SensorChannel::Humidity, window);
    let last_tick = store
        .recent_timeline(window)
        .last()
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "chart window: temperature {}, humidity {}, axis tick {}",
        describe_trace(&temperature),
        describe_trace(&humidity),
        last_tick
    )
}

fn describe_trace(points: &[SeriesPoint]) -> String {
    match points.last() {
        Some(newest) => format!(
            "{} samples, newest {} at {}",
            points.len(),
            newest.value,
            newest.at.format("%H:%M:%S")
        ),
        None => "empty".to_string(),
    }
}
