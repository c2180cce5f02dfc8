//! Configuration management for ChatRelay
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files and environment variables.

use crate::error::{ChatRelayError, Result};
use crate::history::Locale;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for ChatRelay
///
/// Holds everything the service needs: HTTP bind settings, the upstream
/// completion gateway, and history presentation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// History binning configuration
    #[serde(default)]
    pub history: HistoryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Completion gateway configuration
///
/// Points at any endpoint speaking the OpenAI chat-completions wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key sent as a bearer token
    ///
    /// The hosted gateway the product shipped against accepts any
    /// non-empty key; override via config or `CHATRELAY_API_KEY`.
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Token cap applied to every completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Timeout for gateway requests (seconds)
    #[serde(default = "default_gateway_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.voids.top/v1".to_string()
}

fn default_api_key() -> String {
    "emptyok".to_string()
}

fn default_max_tokens() -> usize {
    8192
}

fn default_gateway_timeout() -> u64 {
    120
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: default_api_key(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_gateway_timeout(),
        }
    }
}

/// History binning configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Locale used to render bin labels
    #[serde(default)]
    pub locale: Locale,
}

impl Config {
    /// Load configuration from a file with environment overrides
    ///
    /// Missing files are not an error; defaults are used so the service can
    /// start with zero configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatRelayError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatRelayError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("CHATRELAY_API_BASE") {
            self.gateway.api_base = api_base;
        }

        if let Ok(api_key) = std::env::var("CHATRELAY_API_KEY") {
            self.gateway.api_key = api_key;
        }

        if let Ok(port) = std::env::var("CHATRELAY_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid CHATRELAY_PORT: {}", port);
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(ChatRelayError::Config("server.host cannot be empty".to_string()).into());
        }

        if self.gateway.api_base.is_empty() {
            return Err(
                ChatRelayError::Config("gateway.api_base cannot be empty".to_string()).into(),
            );
        }

        if !self.gateway.api_base.starts_with("http://")
            && !self.gateway.api_base.starts_with("https://")
        {
            return Err(ChatRelayError::Config(format!(
                "gateway.api_base must be an http(s) URL, got: {}",
                self.gateway.api_base
            ))
            .into());
        }

        if self.gateway.max_tokens == 0 {
            return Err(
                ChatRelayError::Config("gateway.max_tokens must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.gateway.timeout_seconds == 0 {
            return Err(ChatRelayError::Config(
                "gateway.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}
