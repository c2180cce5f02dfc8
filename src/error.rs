//! Error types for ChatRelay
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ChatRelay operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, model selection, history binning, and gateway
/// interactions.
#[derive(Error, Debug)]
pub enum ChatRelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway-related errors (API calls, malformed responses, etc.)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Model name outside the supported set
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// No model preference recorded for a user
    #[error("No model preference recorded for user: {0}")]
    PreferenceNotFound(String),

    /// Preference store errors (lock acquisition failures)
    #[error("Preference store error: {0}")]
    Store(String),

    /// Unparseable timestamp encountered while binning history
    #[error("Invalid history timestamp: {0}")]
    HistoryTimestamp(#[from] chrono::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for ChatRelay operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ChatRelayError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_gateway_error_display() {
        let error = ChatRelayError::Gateway("API timeout".to_string());
        assert_eq!(error.to_string(), "Gateway error: API timeout");
    }

    #[test]
    fn test_invalid_model_error_display() {
        let error = ChatRelayError::InvalidModel("gpt-99".to_string());
        assert_eq!(error.to_string(), "Invalid model: gpt-99");
    }

    #[test]
    fn test_preference_not_found_error_display() {
        let error = ChatRelayError::PreferenceNotFound("user-42".to_string());
        assert_eq!(
            error.to_string(),
            "No model preference recorded for user: user-42"
        );
    }

    #[test]
    fn test_history_timestamp_error_conversion() {
        let parse_error = chrono::DateTime::parse_from_rfc3339("not-a-date").unwrap_err();
        let error: ChatRelayError = parse_error.into();
        assert!(matches!(error, ChatRelayError::HistoryTimestamp(_)));
        assert!(error.to_string().starts_with("Invalid history timestamp:"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ChatRelayError = io_error.into();
        assert!(matches!(error, ChatRelayError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: ChatRelayError = json_error.into();
        assert!(matches!(error, ChatRelayError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: ChatRelayError = yaml_error.into();
        assert!(matches!(error, ChatRelayError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatRelayError>();
    }
}
