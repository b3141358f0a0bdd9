// MQTT transport - Broker session feeding the telemetry store
use crate::application::telemetry_store::TelemetryStore;
use crate::domain::actuator::ActuatorCommand;
use crate::domain::channel::{self, SensorChannel};
use crate::infrastructure::config::BrokerSettings;
use bytes::Bytes;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const EVENT_QUEUE: usize = 10;
const RECONNECT_PAUSE: Duration = Duration::from_secs(1);

pub struct MqttTransport {
    client: AsyncClient,
    eventloop: EventLoop,
    broker: BrokerSettings,
}

impl MqttTransport {
    /// Prepare a session against the configured broker. Nothing is sent
    /// until `run` starts polling.
    pub fn connect(broker: &BrokerSettings) -> Self {
        let mut options = MqttOptions::new(&broker.client_id, &broker.host, broker.port);
        options.set_keep_alive(Duration::from_secs(broker.keep_alive_secs));

        let (client, eventloop) = AsyncClient::new(options, EVENT_QUEUE);

        Self {
            client,
            eventloop,
            broker: broker.clone(),
        }
    }

    /// Clone of the session handle, usable for the final disconnect.
    pub fn handle(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Drive the session until shutdown: subscribe on (re)connect, feed
    /// inbound publishes into the store and push queued actuator commands
    /// out to the control topic.
    pub async fn run(
        mut self,
        store: Arc<TelemetryStore>,
        mut commands: mpsc::Receiver<ActuatorCommand>,
    ) {
        loop {
            tokio::select! {
                event = self.eventloop.poll() => match event {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!("connected to {}:{}", self.broker.host, self.broker.port);
                        if let Err(error) = self
                            .client
                            .try_subscribe(channel::SUBSCRIBE_FILTER, QoS::AtMostOnce)
                        {
                            tracing::error!(
                                "subscribe to {} failed: {}",
                                channel::SUBSCRIBE_FILTER, error
                            );
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        handle_publish(&store, &publish.topic, &publish.payload);
                    }
                    Ok(_) => {}
                    Err(error) => {
                        if !store.is_accepting() {
                            break;
                        }
                        tracing::error!("broker connection lost: {}", error);
                        tokio::time::sleep(RECONNECT_PAUSE).await;
                    }
                },
                command = commands.recv() => match command {
                    Some(command) => {
                        tracing::info!("publishing {} to {}", command, channel::CONTROL_TOPIC);
                        if let Err(error) = self.client.try_publish(
                            channel::CONTROL_TOPIC,
                            QoS::AtMostOnce,
                            false,
                            command.token(),
                        ) {
                            tracing::warn!("publish of {} failed: {}", command, error);
                        }
                    }
                    None => break,
                },
            }
        }

        tracing::debug!("transport loop stopped");
    }
}

/// Map a delivered publish onto its channel and ingest it. Topics outside
/// the fixed table are dropped; payload bytes are decoded leniently since
/// the boards occasionally emit stray bytes.
fn handle_publish(store: &TelemetryStore, topic: &str, payload: &Bytes) {
    let text = String::from_utf8_lossy(payload);
    tracing::debug!("received {} => {}", topic, text);

    match SensorChannel::from_topic(topic) {
        Some(channel) => store.ingest(channel, &text),
        None => tracing::trace!("no channel mapped for topic {}", topic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<TelemetryStore> {
        let (store, _commands) = TelemetryStore::new(100);
        Arc::new(store)
    }

    #[test]
    fn test_publish_routes_to_mapped_channel() {
        let store = store();

        handle_publish(&store, "sensor/temperatura", &Bytes::from("21.5"));
        handle_publish(&store, "sensor/servo", &Bytes::from("open"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.temperature.value, Some(21.5));
        assert_eq!(
            snapshot.actuator,
            crate::domain::actuator::ActuatorState::Open
        );
    }

    #[test]
    fn test_unmapped_topic_is_dropped() {
        let store = store();

        handle_publish(&store, "sensor/presion", &Bytes::from("1013"));
        handle_publish(&store, "other/temperatura", &Bytes::from("21.5"));

        let snapshot = store.snapshot();
        assert!(snapshot.temperature.raw.is_none());
        assert!(store.recent_series(SensorChannel::Temperature, 10).is_empty());
    }

    #[test]
    fn test_invalid_utf8_payload_degrades_to_raw_text() {
        let store = store();

        handle_publish(
            &store,
            "sensor/temperatura",
            &Bytes::from_static(b"\xff\xfe21.5"),
        );

        let snapshot = store.snapshot();
        assert!(snapshot.temperature.raw.is_some());
        assert_eq!(snapshot.temperature.value, None);
        assert!(store.recent_series(SensorChannel::Temperature, 10).is_empty());
    }
}
