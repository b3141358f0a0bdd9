// Domain layer - Core telemetry types and channel vocabulary
pub mod actuator;
pub mod channel;
pub mod telemetry;
