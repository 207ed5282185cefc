//! Client configuration
//!
//! TOML-backed settings with defaults for every field. The library never
//! looks for a config file on its own; callers load one explicitly.
//!
//! ```toml
//! base_url = "http://localhost:11434/api"
//! decode_policy = "strict"
//! connect_timeout_secs = 10
//! request_timeout_secs = 600
//! max_line_bytes = 8388608
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ClientError, Result};
use crate::streaming::{DecodePolicy, MAX_LINE_BYTES};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/api";

/// Default connect timeout (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings used to build an [`OllamaClient`](crate::OllamaClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Handling of undecodable streamed lines
    pub decode_policy: DecodePolicy,

    /// TCP connect timeout
    pub connect_timeout_secs: u64,

    /// Whole-request timeout, including streamed bodies; none by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Longest streamed line accepted
    pub max_line_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            decode_policy: DecodePolicy::default(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointing at another server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(contents)
            .map_err(|e| ClientError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ClientError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ClientError::ConfigError(
                "base_url must not be empty".to_string(),
            ));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ClientError::ConfigError(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ClientError::ConfigError(
                "request_timeout_secs must be greater than 0 when set".to_string(),
            ));
        }

        if self.max_line_bytes == 0 {
            return Err(ClientError::ConfigError(
                "max_line_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434/api");
        assert_eq!(config.decode_policy, DecodePolicy::Skip);
        assert!(config.request_timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str(r#"decode_policy = "strict""#).unwrap();
        assert_eq!(config.decode_policy, DecodePolicy::Strict);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_line_bytes, MAX_LINE_BYTES);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = ClientConfig::from_toml_str(r#"decode_policy = "lenient""#);
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ClientConfig::with_base_url("localhost:11434");
        assert!(config.validate().is_err());

        config.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        config = ClientConfig::default();
        config.max_line_bytes = 0;
        assert!(config.validate().is_err());

        config = ClientConfig::default();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ClientConfig::with_base_url("http://gpu-box:11434/api");
        config.request_timeout_secs = Some(600);

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("gpu-box"));
        assert_eq!(ClientConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://10.0.0.5:11434/api\"").unwrap();
        writeln!(file, "connect_timeout_secs = 3").unwrap();

        let config = ClientConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:11434/api");
        assert_eq!(config.connect_timeout_secs, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load_from_file(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }
}
