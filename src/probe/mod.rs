//! Runtime probes feeding the start method selector.
//!
//! Probes answer yes/no questions about the current process: has an
//! accelerator driver already been loaded, is the kernel a compatibility layer,
//! is the process an actor of a host-managed runtime. A probe that cannot
//! answer reports a [`ProbeError`], which callers collapse into a negative
//! signal. Probe failures never reach the selector's caller.

mod driver;
mod host;
pub mod library_detection;
mod registry;

pub use driver::{DriverCheck, DriverProbe};
pub use host::{HostProbes, HostSignal, release_has_marker};
pub use registry::{DriverStatus, ProbeRegistry, ProbeReport};

use std::path::PathBuf;

/// Reasons a probe could not produce an answer.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The probe's data source could not be read.
    #[error("failed to read '{path}'")]
    Unreadable {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The probe has no implementation on this platform.
    #[error("probe not supported on this platform")]
    Unsupported,

    /// A custom probe reported a failure.
    #[error("probe failed: {reason}")]
    Failed {
        /// Description of the failure.
        reason: String,
    },
}
