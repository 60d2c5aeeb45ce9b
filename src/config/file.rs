//! Configuration file loading and saving.

use crate::config::{Config, validate_config};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load and validate configuration from a TOML file.
///
/// A missing file yields the default configuration.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_config(&config)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load configuration from `path` when given, else from the platform default
/// location.
///
/// Platforms without a config directory get the default configuration.
pub fn load_default_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_file(path),
        None => super::config_file_path()
            .map_or_else(|_| Ok(Config::default()), |path| load_config_file(&path)),
    }
}

/// Save configuration to a TOML file, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    std::fs::write(path, contents).map_err(|e| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save configuration to `path` when given, else to the platform default
/// location. Returns the path written.
pub fn save_default_config(config: &Config, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => super::config_file_path()?,
    };
    save_config(config, &path)?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_nonexistent_file_returns_default() {
        let path = Path::new("/nonexistent/path/config.toml");
        let config = load_config_file(path);
        let config = config.unwrap();
        assert_eq!(config.worker.env_key, "WORKER_MP_START_METHOD");
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[worker]
env_key = "APP_WORKER_METHOD"

[probes]
xpu = false

[paths]
runtime_dir = "/run/app"
prefix = "ipc"
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.worker.env_key, "APP_WORKER_METHOD");
        assert!(config.probes.cuda);
        assert!(!config.probes.xpu);
        assert_eq!(
            config.paths.runtime_dir.as_deref(),
            Some(Path::new("/run/app"))
        );
        assert_eq!(config.paths.prefix, "ipc");
        assert_eq!(config.paths.extension, ".lock");
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let config = load_config_file(file.path());
        assert!(matches!(config, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_invalid_values_are_rejected_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[worker]\nenv_key = \"\"").unwrap();

        let config = load_config_file(file.path());
        assert!(matches!(config, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.paths.prefix = "sock".to_string();
        let written = save_default_config(&config, Some(&path)).unwrap();
        assert_eq!(written, path);

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded.paths.prefix, "sock");
        assert_eq!(loaded.worker.env_key, config.worker.env_key);
    }
}
