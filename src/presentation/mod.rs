// Presentation layer - Operator-facing console views
pub mod console;
