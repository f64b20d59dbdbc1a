//! Error handling for the host monitor crate.

/// A specialized `Result` type for host monitor operations.
pub type Result<T> = std::result::Result<T, SystemError>;

/// The main error type for host monitor operations.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// A primary metrics signal (CPU, memory, disk, network) could not be read
    #[error("Metrics provider error: {0}")]
    Provider(String),

    /// User input could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SystemError {
    /// Create a new provider error
    pub fn provider_error(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
