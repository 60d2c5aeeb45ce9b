//! Worker process start methods.

use serde::{Deserialize, Serialize};

/// How a worker process is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMethod {
    /// Duplicate the parent's memory image. Cheapest, unsafe once a native
    /// driver holds state in the parent.
    Fork,
    /// Start a fresh process image and re-run initialization.
    Spawn,
    /// Fork from a clean single-threaded server process.
    ForkServer,
}

impl StartMethod {
    /// Canonical configuration value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fork => "fork",
            Self::Spawn => "spawn",
            Self::ForkServer => "forkserver",
        }
    }
}

impl std::fmt::Display for StartMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StartMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fork" => Ok(Self::Fork),
            "spawn" => Ok(Self::Spawn),
            "forkserver" => Ok(Self::ForkServer),
            other => Err(format!("unknown start method: {other}")),
        }
    }
}
