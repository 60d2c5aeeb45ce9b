//! Host environment probes: kernel compatibility layers and managed actor
//! runtimes.

use super::ProbeError;
use crate::constants::probes::{DEFAULT_KERNEL_RELEASE_MARKERS, DEFAULT_MANAGED_RUNTIME_MARKERS};
use tracing::debug;

/// Source of a host signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostSignal {
    /// Inspect the running host.
    #[default]
    Detect,
    /// Report a fixed value without inspecting anything.
    Fixed(bool),
}

/// Probes describing the host the process runs on.
#[derive(Debug, Clone)]
pub struct HostProbes {
    kernel_layer: HostSignal,
    actor_runtime: HostSignal,
    kernel_release_markers: Vec<String>,
    managed_runtime_markers: Vec<String>,
}

impl Default for HostProbes {
    fn default() -> Self {
        Self {
            kernel_layer: HostSignal::Detect,
            actor_runtime: HostSignal::Detect,
            kernel_release_markers: to_owned_list(DEFAULT_KERNEL_RELEASE_MARKERS),
            managed_runtime_markers: to_owned_list(DEFAULT_MANAGED_RUNTIME_MARKERS),
        }
    }
}

impl HostProbes {
    /// Host probes with the given signal sources and default markers.
    pub fn new(kernel_layer: HostSignal, actor_runtime: HostSignal) -> Self {
        Self {
            kernel_layer,
            actor_runtime,
            ..Self::default()
        }
    }

    /// Host probes with fixed answers, for embedders that already know the
    /// host and for tests.
    pub fn fixed(incompatible_kernel_layer: bool, managed_actor_runtime: bool) -> Self {
        Self::new(
            HostSignal::Fixed(incompatible_kernel_layer),
            HostSignal::Fixed(managed_actor_runtime),
        )
    }

    /// Replace the kernel release substrings that identify a compatibility layer.
    #[must_use]
    pub fn with_kernel_release_markers(mut self, markers: Vec<String>) -> Self {
        self.kernel_release_markers = markers;
        self
    }

    /// Replace the environment variables whose presence marks a managed actor.
    #[must_use]
    pub fn with_managed_runtime_markers(mut self, markers: Vec<String>) -> Self {
        self.managed_runtime_markers = markers;
        self
    }

    /// Whether the process runs on a kernel compatibility layer that cannot
    /// safely share native GPU driver state with a forked child (e.g. WSL).
    pub fn is_running_under_incompatible_kernel_layer(&self) -> bool {
        match self.kernel_layer {
            HostSignal::Fixed(value) => value,
            HostSignal::Detect => match kernel_release() {
                Ok(release) => {
                    let found = release_has_marker(&release, &self.kernel_release_markers);
                    debug!(
                        "Kernel release '{}': compatibility layer={}",
                        release.trim(),
                        found
                    );
                    found
                }
                Err(e) => {
                    debug!(
                        "Kernel release probe unavailable ({}), assuming native kernel",
                        e
                    );
                    false
                }
            },
        }
    }

    /// Whether the process is an actor of a host-managed runtime that itself
    /// requires spawn semantics (e.g. Ray).
    pub fn is_inside_managed_actor_runtime(&self) -> bool {
        match self.actor_runtime {
            HostSignal::Fixed(value) => value,
            HostSignal::Detect => {
                let marker = self
                    .managed_runtime_markers
                    .iter()
                    .find(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()));
                if let Some(name) = marker {
                    debug!("Managed actor runtime detected via {}", name);
                }
                marker.is_some()
            }
        }
    }
}

/// Check whether a kernel release string contains any of `markers`,
/// ignoring case.
pub fn release_has_marker(release: &str, markers: &[String]) -> bool {
    let release = release.to_lowercase();
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .any(|m| release.contains(&m.to_lowercase()))
}

#[cfg(target_os = "linux")]
fn kernel_release() -> Result<String, ProbeError> {
    use crate::constants::probes::KERNEL_OSRELEASE;

    std::fs::read_to_string(KERNEL_OSRELEASE).map_err(|e| ProbeError::Unreadable {
        path: KERNEL_OSRELEASE.into(),
        source: e,
    })
}

#[cfg(not(target_os = "linux"))]
fn kernel_release() -> Result<String, ProbeError> {
    Err(ProbeError::Unsupported)
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
