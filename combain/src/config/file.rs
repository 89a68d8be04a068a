//! Configuration file handling for ~/.combain/config.ini.
//!
//! ```ini
//! [service]
//! api_key = your-combain-key
//! endpoint = https://cps.combain.com
//! timeout = 30
//!
//! [worker]
//! receive_buffer = 1023
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::{ServiceConfig, DEFAULT_ENDPOINT};
use crate::worker::{DEFAULT_RECEIVE_CAPACITY, DEFAULT_TIMEOUT_SECS};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings loaded from the user's configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub endpoint: String,
    /// HTTP timeout in seconds.
    pub timeout: u64,
    /// Receive buffer capacity in bytes.
    pub receive_buffer: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            receive_buffer: DEFAULT_RECEIVE_CAPACITY,
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.combain/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Convert to the library's service configuration.
    pub fn to_service_config(&self) -> ServiceConfig {
        ServiceConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            timeout: Duration::from_secs(self.timeout),
            receive_capacity: self.receive_buffer,
        }
    }
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("endpoint") {
            let v = v.trim();
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("service", "endpoint", v, "must be an http(s) URL"));
            }
            config.endpoint = v.to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.timeout = parse_positive(v).ok_or_else(|| {
                invalid("service", "timeout", v, "must be a positive integer (seconds)")
            })?;
        }
    }

    // [worker] section
    if let Some(section) = ini.section(Some("worker")) {
        if let Some(v) = section.get("receive_buffer") {
            config.receive_buffer = parse_positive(v).ok_or_else(|| {
                invalid("worker", "receive_buffer", v, "must be a positive integer (bytes)")
            })?;
        }
    }

    Ok(config)
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value.trim().parse::<T>().ok().filter(|v| *v > T::default())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Get the path to the config directory (~/.combain).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".combain")
}

/// Get the path to the config file (~/.combain/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.ini");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_all_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[service]\napi_key = abc123\nendpoint = http://localhost:9000\ntimeout = 5\n\n[worker]\nreceive_buffer = 8192\n",
        );

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.receive_buffer, 8192);

        let service = config.to_service_config();
        assert_eq!(service.api_key, "abc123");
        assert_eq!(service.timeout, Duration::from_secs(5));
        assert_eq!(service.receive_capacity, 8192);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[service]\napi_key =\n");

        let config = ConfigFile::load_from(&path).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[service]\ntimeout = soon\n");

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "timeout"
        ));
        assert!(err.to_string().contains("service.timeout"));
    }

    #[test]
    fn test_zero_receive_buffer_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[worker]\nreceive_buffer = 0\n");

        assert!(ConfigFile::load_from(&path).is_err());
    }

    #[test]
    fn test_invalid_endpoint() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[service]\nendpoint = cps.combain.com\n");

        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".combain/config.ini"));
    }
}
