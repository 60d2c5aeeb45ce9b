//! Machine-readable output for the diagnostic CLI.

pub mod json_envelope;

pub use json_envelope::{EventType, JsonEnvelope, ResultPayload, print_json};
