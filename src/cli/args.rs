//! CLI argument definitions.

use crate::constants::CONFIG_PATH_ENV;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect worker start method decisions and reserve unique paths.
#[derive(Debug, Parser)]
#[command(name = "forkguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Path to an alternative configuration file.
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decide the worker start method for this environment.
    Method {
        /// Print a JSON envelope instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Show the answer of every registered probe.
    Probes {
        /// Print a JSON envelope instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Reserve unique paths in a directory.
    Reserve {
        /// Directory to reserve paths in (default: configured runtime dir).
        dir: Option<PathBuf>,
        /// File name prefix (default: from config).
        #[arg(long)]
        prefix: Option<String>,
        /// File name extension including the dot (default: from config).
        #[arg(long)]
        extension: Option<String>,
        /// Number of paths to reserve.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Print a JSON envelope instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}
