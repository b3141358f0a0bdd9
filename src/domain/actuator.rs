// Actuator state and command domain models
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Last actuator position reported over the status topic.
///
/// Driven only by inbound status messages; submitting a command never moves
/// this state. Unknown is both the initial state and where it stays when a
/// status payload is unrecognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActuatorState {
    #[default]
    Unknown,
    Open,
    Closed,
}

impl ActuatorState {
    /// Map a status payload to a state. Matching is case-insensitive;
    /// anything but "open"/"closed" yields `None` (no transition).
    pub fn from_status(payload: &str) -> Option<Self> {
        match payload.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Outbound request for the actuator; fire-and-forget, confirmation only
/// ever arrives as a later status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    Open,
    Close,
}

impl ActuatorCommand {
    /// Literal token published to the control topic.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Error)]
#[error("unknown actuator command {input:?}, expected \"open\" or \"close\"")]
pub struct InvalidCommand {
    pub input: String,
}

impl FromStr for ActuatorCommand {
    type Err = InvalidCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            _ => Err(InvalidCommand {
                input: s.trim().to_string(),
            }),
        }
    }
}
