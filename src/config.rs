use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Limits enforced by [`parse_request_strict`](crate::parse_request_strict).
///
/// All sizes are in bytes unless stated otherwise. The lenient parser
/// ignores these entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Maximum length of the request line (default: 8 192).
    pub max_request_line_len: usize,
    /// Maximum length of a single header line (default: 8 192).
    pub max_header_line_len: usize,
    /// Maximum number of header lines (default: 128).
    pub max_headers_count: usize,
    /// Maximum body size (default: 10 MiB).
    pub max_body_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_request_line_len: 8_192,
            max_header_line_len: 8_192,
            max_headers_count: 128,
            max_body_size: 10 * 1024 * 1024,
        }
    }
}

impl ParserConfig {
    /// Parse a config from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or a zero limit.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "parser config loaded");
        Ok(config)
    }

    /// Reject limits that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_request_line_len", self.max_request_line_len),
            ("max_header_line_len", self.max_header_line_len),
            ("max_headers_count", self.max_headers_count),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ParserConfig::from_toml_str("max_headers_count = 4\n").unwrap();
        assert_eq!(config.max_headers_count, 4);
        assert_eq!(config.max_body_size, ParserConfig::default().max_body_size);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ParserConfig::from_toml_str("").unwrap(), ParserConfig::default());
    }

    #[test]
    fn zero_limit_rejected() {
        let err = ParserConfig::from_toml_str("max_header_line_len = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_body_size_allowed() {
        let config = ParserConfig::from_toml_str("max_body_size = 0").unwrap();
        assert_eq!(config.max_body_size, 0);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ParserConfig::from_toml_str("max_uri_len = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ParserConfig::load(Path::new("/nonexistent/rawframe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
