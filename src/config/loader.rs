//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a TOML file without validating it.
///
/// Used when further overrides are applied before validation.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use crate::lifecycle::signals::SignalName;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.http.bind_address, "0.0.0.0:8000");
        assert_eq!(config.shutdown.grace_period_secs, 30);
        assert_eq!(config.signals.terminate.len(), 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = parse_config(
            r#"
            [http]
            bind_address = "127.0.0.1:9000"

            [signals]
            terminate = ["SIGTERM", "INT"]

            [observability]
            log_format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.bind_address, "127.0.0.1:9000");
        assert_eq!(config.http.shutdown_path, "/shutdown");
        assert_eq!(
            config.signals.terminate,
            vec![SignalName::Terminate, SignalName::Interrupt]
        );
        assert_eq!(config.signals.observe.len(), 4);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_signal_rejected() {
        let err = parse_config("[signals]\nterminate = [\"SIGNOPE\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("SIGNOPE"));
    }

    #[test]
    fn test_load_config_validates() {
        let path = std::env::temp_dir().join(format!("lifeline-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[shutdown]\ngrace_period_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap_or_default();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::ZeroGracePeriod]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_config_defers_validation() {
        let path = std::env::temp_dir().join(format!("lifeline-read-{}.toml", std::process::id()));
        std::fs::write(&path, "[shutdown]\ngrace_period_secs = 0\n").unwrap();

        let config = read_config(&path);
        std::fs::remove_file(&path).unwrap_or_default();

        assert_eq!(config.unwrap().shutdown.grace_period_secs, 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
