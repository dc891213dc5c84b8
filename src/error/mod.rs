//! Error handling for the RPC latency sweeper

use thiserror::Error;

/// Convenient result type used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Custom error types for the RPC latency sweeper
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (environment values, .env parsing)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider construction errors (bad URL, failed WebSocket handshake)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Per-call transport errors (connection reset, malformed response)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON-RPC level errors (the response carried an `error` member)
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Statistics calculation errors
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Report output errors (CSV/chart file writing)
    #[error("Report error: {0}")]
    Report(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new provider construction error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new RPC-level error
    pub fn rpc<S: Into<String>>(message: S) -> Self {
        Self::Rpc(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new report error
    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::Report(message.into())
    }

    /// Get error category, prefixed to the fatal error line in `main`
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Provider(_) => "PROVIDER",
            Self::Transport(_) => "TRANSPORT",
            Self::Rpc(_) => "RPC",
            Self::Statistics(_) => "STATS",
            Self::Report(_) => "REPORT",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Provider(_) => 2,
            Self::Report(_) => 3,
            Self::Transport(_) | Self::Rpc(_) | Self::Statistics(_) => 4,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Report(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("JSON encoding failed: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::provider("x").category(), "PROVIDER");
        assert_eq!(AppError::transport("x").category(), "TRANSPORT");
        assert_eq!(AppError::rpc("x").category(), "RPC");
        assert_eq!(AppError::statistics("x").category(), "STATS");
        assert_eq!(AppError::report("x").category(), "REPORT");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::provider("x").exit_code(), 2);
        assert_eq!(AppError::report("x").exit_code(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::provider("invalid URL 'nope'");
        assert_eq!(err.to_string(), "Provider error: invalid URL 'nope'");
    }
}
