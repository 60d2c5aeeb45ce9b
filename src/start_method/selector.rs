//! Start method selection.
//!
//! Evaluation order, first match wins:
//!
//! 1. A non-empty override is returned unchanged, even when a driver is
//!    already initialized. Expert users can force `fork` this way; nothing
//!    re-checks safety on top of it.
//! 2. A kernel compatibility layer (WSL) forces spawn.
//! 3. A managed actor runtime forces spawn.
//! 4. Any registered driver reporting initialized state forces spawn.
//! 5. Otherwise fork.

use super::StartMethod;
use crate::error::{Error, Result};
use crate::probe::ProbeRegistry;
use serde::Serialize;
use std::fmt;

/// Why a start method was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "vendor", rename_all = "snake_case")]
pub enum Reason {
    /// The configuration key held an explicit value.
    ExplicitOverride,
    /// Running on a kernel compatibility layer.
    IncompatibleKernelLayer,
    /// Running as an actor of a host-managed runtime.
    ManagedActorRuntime,
    /// A driver already holds state in this process.
    DriverInitialized(String),
    /// Nothing prevents forking.
    Default,
}

impl Reason {
    /// Whether this reason overrides the default with spawn.
    pub fn forces_spawn(&self) -> bool {
        matches!(
            self,
            Self::IncompatibleKernelLayer | Self::ManagedActorRuntime | Self::DriverInitialized(_)
        )
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitOverride => f.write_str("explicit override"),
            Self::IncompatibleKernelLayer => f.write_str("kernel compatibility layer (WSL)"),
            Self::ManagedActorRuntime => f.write_str("inside a managed actor runtime"),
            Self::DriverInitialized(vendor) => write!(f, "driver already initialized ({vendor})"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// Outcome of start method selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Chosen start method.
    pub method: StartMethod,
    /// Why it was chosen.
    pub reason: Reason,
}

impl Decision {
    const fn new(method: StartMethod, reason: Reason) -> Self {
        Self { method, reason }
    }
}

/// Parse an override value. Empty or whitespace-only means unset.
pub fn parse_override(key: &str, value: Option<&str>) -> Result<Option<StartMethod>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidOverride {
                key: key.to_string(),
                value: raw.to_string(),
            }),
    }
}

/// Choose the start method from an override value and the registered probes.
///
/// Reads ambient state only; persisting a forced decision is the caller's job.
pub fn select(key: &str, override_value: Option<&str>, probes: &ProbeRegistry) -> Result<Decision> {
    if let Some(method) = parse_override(key, override_value)? {
        return Ok(Decision::new(method, Reason::ExplicitOverride));
    }

    let host = probes.host();
    if host.is_running_under_incompatible_kernel_layer() {
        return Ok(Decision::new(StartMethod::Spawn, Reason::IncompatibleKernelLayer));
    }

    if host.is_inside_managed_actor_runtime() {
        return Ok(Decision::new(StartMethod::Spawn, Reason::ManagedActorRuntime));
    }

    if let Some(probe) = probes.first_initialized_driver() {
        return Ok(Decision::new(
            StartMethod::Spawn,
            Reason::DriverInitialized(probe.vendor().to_string()),
        ));
    }

    Ok(Decision::new(StartMethod::Fork, Reason::Default))
}
