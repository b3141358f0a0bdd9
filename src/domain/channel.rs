// Sensor channel identifiers and the fixed MQTT topic table
use std::fmt;

/// Wildcard filter covering every sensor topic the dashboard consumes.
pub const SUBSCRIBE_FILTER: &str = "sensor/#";

/// Topic the actuator listens on for commands, outside the sensor tree.
pub const CONTROL_TOPIC: &str = "home9/ebb2025/servo1";

/// One logical value stream published by the sensor board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    Temperature,
    Humidity,
    Motion,
    Distance,
    Timestamp,
    ActuatorStatus,
}

impl SensorChannel {
    /// Map an inbound topic to its channel. The table is fixed and
    /// case-sensitive; unknown topics yield `None`.
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "sensor/temperatura" => Some(Self::Temperature),
            "sensor/humedad" => Some(Self::Humidity),
            "sensor/movimiento" => Some(Self::Motion),
            "sensor/distancia" => Some(Self::Distance),
            "sensor/fecha" => Some(Self::Timestamp),
            "sensor/servo" => Some(Self::ActuatorStatus),
            _ => None,
        }
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Motion => "motion",
            Self::Distance => "distance",
            Self::Timestamp => "timestamp",
            Self::ActuatorStatus => "actuator-status",
        };
        f.write_str(name)
    }
}
