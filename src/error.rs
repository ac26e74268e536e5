use std::fmt;

#[derive(Debug)]
pub enum RelayError {
    ConfigError(String),
    ClientError(String),
    ServerError(String),
    InternalError(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            RelayError::ClientError(msg) => write!(f, "Client error: {}", msg),
            RelayError::ServerError(msg) => write!(f, "Server error: {}", msg),
            RelayError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

pub type Result<T> = std::result::Result<T, RelayError>;
