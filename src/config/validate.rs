//! Configuration validation.

use crate::config::{Config, PathsConfig, WorkerConfig};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_worker(&config.worker)?;
    validate_paths(&config.paths)?;
    Ok(())
}

/// The key must be usable as an environment variable name.
fn validate_worker(worker: &WorkerConfig) -> Result<()> {
    let key = &worker.env_key;

    if key.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "worker.env_key must not be empty".to_string(),
        });
    }

    if key.contains(['=', '\0']) {
        return Err(Error::ConfigValidation {
            message: format!("worker.env_key must not contain '=' or NUL, got '{key}'"),
        });
    }

    Ok(())
}

fn validate_paths(paths: &PathsConfig) -> Result<()> {
    validate_name_parts(&paths.prefix, &paths.extension)
}

/// Prefix and extension are joined onto the runtime directory, so neither
/// may introduce path components.
pub fn validate_name_parts(prefix: &str, extension: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(Error::ConfigValidation {
            message: "paths.prefix must not be empty".to_string(),
        });
    }

    for (field, value) in [("prefix", prefix), ("extension", extension)] {
        if value.contains(std::path::is_separator) || value.contains('\0') {
            return Err(Error::ConfigValidation {
                message: format!("paths.{field} must be a plain file name part, got '{value}'"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_env_key_rejects_empty_and_equals() {
        let mut config = Config::default();
        config.worker.env_key = "  ".to_string();
        assert!(validate_config(&config).is_err());

        config.worker.env_key = "A=B".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_prefix_rejects_separators() {
        let mut config = Config::default();
        config.paths.prefix = "../escape".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));

        config.paths.prefix = "worker".to_string();
        config.paths.extension = "/.lock".to_string();
        assert!(validate_config(&config).is_err());

        config.paths.extension = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_name_parts_reject_parent_traversal() {
        assert!(validate_name_parts("ipc", ".sock").is_ok());
        assert!(matches!(
            validate_name_parts("../x", ".lock"),
            Err(Error::ConfigValidation { .. })
        ));
        assert!(validate_name_parts("", ".lock").is_err());
        assert!(validate_name_parts("ipc", "/../x").is_err());
    }
}
