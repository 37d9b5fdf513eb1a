use std::fmt;

#[derive(Debug)]
pub enum R3asonError {
    ApiError {
        status: u16,
        message: String,
    },
    #[allow(dead_code)]
    ConfigError(String),
    /// The model's response did not decode into the reasoning schema.
    SchemaViolation(String),
    /// An incremental request terminated without delivering any fragments.
    EmptyStream,
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    Other(String),
}

impl fmt::Display for R3asonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            R3asonError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            R3asonError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            R3asonError::SchemaViolation(msg) => write!(f, "Schema violation: {}", msg),
            R3asonError::EmptyStream => write!(f, "Stream ended without any content fragments"),
            R3asonError::NetworkError(e) => write!(f, "Network error: {}", e),
            R3asonError::Timeout => write!(f, "Request timeout"),
            R3asonError::IoError(e) => write!(f, "IO error: {}", e),
            R3asonError::JsonError(e) => write!(f, "JSON error: {}", e),
            R3asonError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for R3asonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            R3asonError::NetworkError(e) => Some(e),
            R3asonError::IoError(e) => Some(e),
            R3asonError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for R3asonError {
    fn from(err: reqwest::Error) -> Self {
        R3asonError::NetworkError(err)
    }
}

impl From<std::io::Error> for R3asonError {
    fn from(err: std::io::Error) -> Self {
        R3asonError::IoError(err)
    }
}

impl From<serde_json::Error> for R3asonError {
    fn from(err: serde_json::Error) -> Self {
        R3asonError::JsonError(err)
    }
}

impl From<anyhow::Error> for R3asonError {
    fn from(err: anyhow::Error) -> Self {
        R3asonError::Other(err.to_string())
    }
}

impl From<String> for R3asonError {
    fn from(msg: String) -> Self {
        R3asonError::Other(msg)
    }
}

impl From<&str> for R3asonError {
    fn from(msg: &str) -> Self {
        R3asonError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, R3asonError>;
