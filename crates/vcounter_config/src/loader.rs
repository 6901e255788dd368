//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::HarnessConfig;
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "vcounter.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `<dir>/vcounter.toml` if it exists, otherwise returns the defaults.
pub fn load_config_or_default(dir: &Path) -> Result<HarnessConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load_config(&path)
    } else {
        Ok(HarnessConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HarnessConfig, ConfigError> {
    let config: HarnessConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are in range and consistent.
fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    let width = config.device.width;
    if !(1..=64).contains(&width) {
        return Err(ConfigError::ValidationError(format!(
            "device.width must be between 1 and 64, got {width}"
        )));
    }
    if let Some(at) = config.device.finish_at {
        if width < 64 && at >> width != 0 {
            return Err(ConfigError::ValidationError(format!(
                "device.finish_at = {at} does not fit in a {width}-bit counter"
            )));
        }
    }
    if config.trace.enabled && config.trace.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "trace.path must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[trace]
enabled = true
path = "out/run.vcd"

[device]
width = 4
finish_at = 15
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.trace.path, "out/run.vcd");
        assert_eq!(config.device.width, 4);
        assert_eq!(config.device.finish_at, Some(15));
    }

    #[test]
    fn zero_width_rejected() {
        let err = load_config_from_str("[device]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn oversized_width_rejected() {
        let err = load_config_from_str("[device]\nwidth = 65\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn finish_at_must_fit_width() {
        let err = load_config_from_str("[device]\nwidth = 4\nfinish_at = 16\n").unwrap_err();
        assert!(err.to_string().contains("does not fit in a 4-bit counter"));
    }

    #[test]
    fn empty_trace_path_rejected_only_when_enabled() {
        let err = load_config_from_str("[trace]\npath = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let config = load_config_from_str("[trace]\nenabled = false\npath = \"\"\n").unwrap();
        assert!(!config.trace.enabled);
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path()).unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn present_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[device]\nwidth = 16\n").unwrap();
        let config = load_config_or_default(dir.path()).unwrap();
        assert_eq!(config.device.width, 16);
    }

    #[test]
    fn io_error_from_nonexistent_file() {
        let err = load_config(Path::new("/nonexistent/dir/vcounter.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
