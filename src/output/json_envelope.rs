//! JSON envelope types for CLI output.
//!
//! Every `--json` command prints exactly one envelope so orchestration
//! scripts can consume forkguard's answers without scraping text.

use crate::error::{Error, Result};
use crate::probe::ProbeReport;
use crate::start_method::{Reason, StartMethod};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Current schema version of the JSON envelope.
pub const SCHEMA_VERSION: &str = "1.0";

/// JSON envelope wrapping CLI output.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// Envelope schema version.
    pub schema_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Final result of a command.
    Result,
}

/// Result payloads, discriminated by `result_type`.
#[derive(Debug, Serialize)]
#[serde(tag = "result_type", rename_all = "snake_case")]
pub enum ResultPayload {
    /// Start method decision.
    StartMethod {
        /// Chosen start method.
        method: StartMethod,
        /// Why it was chosen.
        reason: Reason,
        /// Configuration key consulted.
        env_key: String,
        /// Value children inherit, if any.
        exported: Option<String>,
    },
    /// Probe answers.
    Probes {
        /// Per-probe report.
        report: ProbeReport,
    },
    /// Reserved paths.
    Reservations {
        /// Paths now owned by the caller.
        paths: Vec<PathBuf>,
    },
}

/// Print a result payload wrapped in an envelope to stdout.
#[allow(clippy::print_stdout)]
pub fn print_json(payload: ResultPayload) -> Result<()> {
    let envelope = JsonEnvelope::new(EventType::Result, payload);
    let json =
        serde_json::to_string_pretty(&envelope).map_err(|e| Error::JsonSerialize { source: e })?;
    println!("{json}");
    Ok(())
}
