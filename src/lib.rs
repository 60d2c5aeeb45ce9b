//! Forkguard - fork-safe worker start method selection.
//!
//! A worker pool sharing its process with a native accelerator driver must not
//! fork once the driver has created device state. This crate decides whether
//! workers may be forked or must be spawned ([`start_method`]), and reserves
//! collision-free paths for worker coordination files ([`paths`]).

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod paths;
pub mod probe;
pub mod start_method;

use clap::Parser;
use cli::{Cli, Command, ConfigAction};
use config::{
    Config, config_file_path, load_default_config, save_default_config, validate_name_parts,
};
use output::{ResultPayload, print_json};
use paths::UniquePathAllocator;
use probe::ProbeRegistry;
use start_method::ProcessStartupConfig;
use std::path::{Path, PathBuf};

pub use error::{Error, Result};
pub use paths::{unique_path, unique_path_in};
pub use start_method::{Decision, Reason, StartMethod, WorkerContext};

/// Main entry point for the forkguard CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = load_default_config(cli.config.as_deref())?;

    handle_command(cli.command, &config, cli.config.as_deref())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // stdout carries command results
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, config: &Config, config_path: Option<&Path>) -> Result<()> {
    match command {
        Command::Method { json } => handle_method_command(config, json),
        Command::Probes { json } => handle_probes_command(config, json),
        Command::Reserve {
            dir,
            prefix,
            extension,
            count,
            json,
        } => handle_reserve_command(config, dir, prefix, extension, count, json),
        Command::Config { action } => handle_config_command(action, config, config_path),
    }
}

#[allow(clippy::print_stdout)]
fn handle_method_command(config: &Config, json: bool) -> Result<()> {
    let probes = ProbeRegistry::from_config(&config.probes);
    let mut startup = ProcessStartupConfig::from_env_with_key(&config.worker.env_key, probes);
    let context = startup.context()?;

    if json {
        return print_json(ResultPayload::StartMethod {
            method: context.method(),
            reason: context.reason().clone(),
            env_key: startup.key().to_string(),
            exported: context.env_pair().map(|(_, value)| value.to_string()),
        });
    }

    println!("method: {}", context.method());
    println!("reason: {}", context.reason());
    if let Some((key, value)) = context.env_pair() {
        println!("export: {key}={value}");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_probes_command(config: &Config, json: bool) -> Result<()> {
    let report = ProbeRegistry::from_config(&config.probes).report();

    if json {
        return print_json(ResultPayload::Probes { report });
    }

    println!("kernel compatibility layer: {}", yes_no(report.incompatible_kernel_layer));
    println!("managed actor runtime:      {}", yes_no(report.managed_actor_runtime));
    if report.drivers.is_empty() {
        println!("drivers:                    none registered");
    }
    for driver in &report.drivers {
        let state = if !driver.available {
            "unavailable"
        } else if driver.initialized {
            "initialized"
        } else {
            "not initialized"
        };
        println!("driver {}: {state}", driver.vendor);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_reserve_command(
    config: &Config,
    dir: Option<PathBuf>,
    prefix: Option<String>,
    extension: Option<String>,
    count: usize,
    json: bool,
) -> Result<()> {
    let prefix = prefix.unwrap_or_else(|| config.paths.prefix.clone());
    let extension = extension.unwrap_or_else(|| config.paths.extension.clone());
    validate_name_parts(&prefix, &extension)?;

    let allocator = UniquePathAllocator::new(
        dir.unwrap_or_else(|| config.paths.runtime_dir()),
        prefix,
        extension,
    );

    let paths = (0..count)
        .map(|_| allocator.allocate())
        .collect::<Result<Vec<_>>>()?;

    if json {
        return print_json(ResultPayload::Reservations { paths });
    }

    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_config_command(
    action: ConfigAction,
    config: &Config,
    config_path: Option<&Path>,
) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default(), Some(&path))?;
                println!("Created configuration file: {}", saved_path.display());
            }
        }
        ConfigAction::Show => println!("{config:#?}"),
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
