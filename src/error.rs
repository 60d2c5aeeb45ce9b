//! Error types for forkguard.

/// Result type alias for forkguard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for forkguard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// The start method configuration key holds an unrecognized value.
    #[error("invalid value '{value}' for {key} (expected one of: fork, spawn, forkserver)")]
    InvalidOverride {
        /// Configuration key that was read.
        key: String,
        /// The offending value, as found.
        value: String,
    },

    /// Exclusive creation of a candidate path failed for a reason other than
    /// the path already existing.
    #[error("failed to reserve path '{path}'")]
    PathReserve {
        /// Candidate path that could not be created.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON output")]
    JsonSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}
