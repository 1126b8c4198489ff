use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_FILE: &str = "frontdoh.toml";

/// Classic UDP DNS payload limit; smaller buffers could not hold a minimal query.
const MIN_DATAGRAM_SIZE: usize = 512;
const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Main configuration structure for Frontdoh
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// UDP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Domain-fronted DoH upstream
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. frontdoh.toml in current directory
    /// 3. Default configuration
    ///
    /// Command-line overrides are applied on top of whichever source won.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_FILE).exists() {
            Self::from_file(LOCAL_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen_address {
            self.server.listen_address = listen;
        }
        if let Some(sni) = overrides.tls_server_name {
            self.upstream.tls_server_name = sni;
        }
        if let Some(host) = overrides.host_header {
            self.upstream.host_header = host;
        }
        if let Some(timeout) = overrides.request_timeout {
            self.upstream.request_timeout = timeout;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.tls_server_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "SNI not set (--sni)".to_string(),
            ));
        }

        if self.upstream.host_header.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Host header cannot be empty".to_string(),
            ));
        }

        if !self.upstream.resolve_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "Resolve path must start with '/': {}",
                self.upstream.resolve_path
            )));
        }

        if self.upstream.request_timeout == 0 {
            return Err(ConfigError::Validation(
                "Request timeout cannot be 0".to_string(),
            ));
        }

        if self.server.listen_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Listen address cannot be empty".to_string(),
            ));
        }

        if !(MIN_DATAGRAM_SIZE..=MAX_DATAGRAM_SIZE).contains(&self.server.max_datagram_size) {
            return Err(ConfigError::Validation(format!(
                "max_datagram_size must be between {} and {}, got {}",
                MIN_DATAGRAM_SIZE, MAX_DATAGRAM_SIZE, self.server.max_datagram_size
            )));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_address: Option<String>,
    pub tls_server_name: Option<String>,
    pub host_header: Option<String>,
    pub request_timeout: Option<u64>,
    pub log_level: Option<String>,
}
