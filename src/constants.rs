//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "forkguard";

/// Process-wide configuration key holding the worker start method.
///
/// Recognized values are `fork`, `spawn` and `forkserver`. Empty or unset
/// means "no override, auto-detect".
pub const START_METHOD_ENV: &str = "WORKER_MP_START_METHOD";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FORKGUARD_CONFIG";

/// Configuration file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Driver and host probe constants.
pub mod probes {
    /// Libraries whose presence in the process address space means the NVIDIA
    /// driver (or NVML) has been loaded and may hold device state.
    ///
    /// `libcuda` is the driver API itself, loaded lazily by the runtime on first
    /// use. `libnvidia-ml` is NVML, whose init/shutdown cycle in a parent is
    /// enough to break NVML in a forked child.
    pub const CUDA_LIBRARY_PATTERNS: &[&str] = &["libcuda.so*", "libnvidia-ml.so*"];

    /// Libraries indicating the Intel Level Zero (XPU) driver is loaded.
    pub const XPU_LIBRARY_PATTERNS: &[&str] = &["libze_loader.so*", "libze_intel_gpu.so*"];

    /// Memory map listing of the current process (Linux).
    pub const PROC_SELF_MAPS: &str = "/proc/self/maps";

    /// Kernel release string (Linux).
    pub const KERNEL_OSRELEASE: &str = "/proc/sys/kernel/osrelease";

    /// Kernel release substrings identifying a compatibility layer that cannot
    /// share native GPU driver state with a forked child (WSL).
    pub const DEFAULT_KERNEL_RELEASE_MARKERS: &[&str] = &["microsoft"];

    /// Environment variables set inside actors of a host-managed runtime (Ray).
    pub const DEFAULT_MANAGED_RUNTIME_MARKERS: &[&str] = &["RAY_RAYLET_PID"];
}

/// Unique path reservation defaults.
pub mod paths {
    /// Default file name prefix for reserved paths.
    pub const DEFAULT_PREFIX: &str = "worker";

    /// Default extension (including the dot) for reserved paths.
    pub const DEFAULT_EXTENSION: &str = ".lock";
}
