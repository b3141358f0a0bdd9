// Application layer - Stateful services behind the transport and display
pub mod telemetry_store;
