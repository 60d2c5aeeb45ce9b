//! Startup-time registration of the probes a process consults.

use super::{DriverProbe, HostProbes};
use crate::config::ProbesConfig;
use serde::Serialize;

/// The set of probes registered for this process.
#[derive(Debug, Clone, Default)]
pub struct ProbeRegistry {
    drivers: Vec<DriverProbe>,
    host: HostProbes,
}

impl ProbeRegistry {
    /// Registry with the given host probes and no driver probes.
    pub fn new(host: HostProbes) -> Self {
        Self {
            drivers: Vec::new(),
            host,
        }
    }

    /// Build the registry described by the configuration.
    pub fn from_config(config: &ProbesConfig) -> Self {
        let host = HostProbes::default()
            .with_kernel_release_markers(config.kernel_release_markers.clone())
            .with_managed_runtime_markers(config.managed_runtime_markers.clone());

        let mut registry = Self::new(host);
        if config.cuda {
            registry = registry.register(DriverProbe::Cuda);
        }
        if config.xpu {
            registry = registry.register(DriverProbe::Xpu);
        }
        registry
    }

    /// Add a driver probe.
    #[must_use]
    pub fn register(mut self, probe: DriverProbe) -> Self {
        self.drivers.push(probe);
        self
    }

    /// Registered driver probes, in registration order.
    pub fn drivers(&self) -> &[DriverProbe] {
        &self.drivers
    }

    /// Host probes.
    pub fn host(&self) -> &HostProbes {
        &self.host
    }

    /// First registered driver reporting initialized state, if any.
    pub fn first_initialized_driver(&self) -> Option<&DriverProbe> {
        self.drivers.iter().find(|probe| probe.is_initialized())
    }

    /// Evaluate every probe once, for diagnostics.
    pub fn report(&self) -> ProbeReport {
        ProbeReport {
            incompatible_kernel_layer: self.host.is_running_under_incompatible_kernel_layer(),
            managed_actor_runtime: self.host.is_inside_managed_actor_runtime(),
            drivers: self
                .drivers
                .iter()
                .map(|probe| {
                    let answer = probe.try_is_initialized();
                    DriverStatus {
                        vendor: probe.vendor().to_string(),
                        available: answer.is_ok(),
                        initialized: answer.unwrap_or(false),
                    }
                })
                .collect(),
        }
    }
}

/// Snapshot of every probe's answer.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Kernel compatibility layer detected.
    pub incompatible_kernel_layer: bool,
    /// Running inside a managed actor runtime.
    pub managed_actor_runtime: bool,
    /// Per-driver status.
    pub drivers: Vec<DriverStatus>,
}

/// Answer of a single driver probe.
#[derive(Debug, Clone, Serialize)]
pub struct DriverStatus {
    /// Vendor name.
    pub vendor: String,
    /// Whether the probe could answer at all.
    pub available: bool,
    /// Driver initialized in this process (`false` when unavailable).
    pub initialized: bool,
}
