//! Configuration type definitions.

use crate::constants::START_METHOD_ENV;
use crate::constants::paths::{DEFAULT_EXTENSION, DEFAULT_PREFIX};
use crate::constants::probes::{DEFAULT_KERNEL_RELEASE_MARKERS, DEFAULT_MANAGED_RUNTIME_MARKERS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker start method settings.
    pub worker: WorkerConfig,

    /// Probe registration.
    pub probes: ProbesConfig,

    /// Unique path reservation settings.
    pub paths: PathsConfig,
}

/// Worker start method settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Name of the process-wide configuration key holding the start method.
    pub env_key: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            env_key: START_METHOD_ENV.to_string(),
        }
    }
}

/// Which probes to register at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbesConfig {
    /// Register the NVIDIA driver probe.
    pub cuda: bool,

    /// Register the Intel XPU driver probe.
    pub xpu: bool,

    /// Environment variables marking a managed actor runtime.
    pub managed_runtime_markers: Vec<String>,

    /// Kernel release substrings marking a kernel compatibility layer.
    pub kernel_release_markers: Vec<String>,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            cuda: true,
            xpu: true,
            managed_runtime_markers: DEFAULT_MANAGED_RUNTIME_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            kernel_release_markers: DEFAULT_KERNEL_RELEASE_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Unique path reservation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory reserved paths are created in (default: system temp dir).
    pub runtime_dir: Option<PathBuf>,

    /// File name prefix.
    pub prefix: String,

    /// File name extension, including the leading dot.
    pub extension: String,
}

impl PathsConfig {
    /// Resolved runtime directory.
    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            runtime_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}
