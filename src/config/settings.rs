//! Application settings configuration
//!
//! Defines connection defaults for the fetcher and the thresholds used by the
//! evaluation engine.

use crate::utils::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection settings for the certificate fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Target TCP port
    pub port: u32,
    /// Deadline for TCP connect plus TLS handshake
    pub timeout_ms: u64,
    /// Retrieve the full chain with issuer links
    pub detailed: bool,
    /// Consult the WebPKI trust store during the handshake
    pub verify_trust: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            port: 443,
            timeout_ms: 5000,
            detailed: true,
            verify_trust: false,
        }
    }
}

impl FetchSettings {
    pub fn with_port(mut self, port: u32) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn with_verify_trust(mut self, verify_trust: bool) -> Self {
        self.verify_trust = verify_trust;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject values the fetcher could never use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=65535).contains(&self.port) {
            return Err(ConfigError::InvalidValue {
                key: "fetch.port".to_string(),
                message: format!("{} is outside 1-65535", self.port),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Thresholds for the evaluation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Warn when fewer than this many days remain
    pub expiry_warning_days: i64,
    /// Validity periods shorter than this are unusual
    pub min_validity_days: i64,
    /// Current public-CA maximum certificate lifetime
    pub max_validity_days: i64,
    /// RSA keys smaller than this are weak
    pub min_rsa_key_bits: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            expiry_warning_days: 30,
            min_validity_days: 1,
            max_validity_days: 398,
            min_rsa_key_bits: 2048,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub evaluation: EvaluationSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.fetch.validate()?;
        Ok(settings)
    }
}
