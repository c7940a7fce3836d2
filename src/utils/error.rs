use std::collections::HashMap;
use thiserror::Error;

/// A failed argument validation: message plus the HTTP status code and any
/// extra data a web integration wants to attach to the response.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
    pub status_code: u16,
    pub data: HashMap<String, serde_json::Value>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 400,
            data: HashMap::new(),
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Replace the message, keeping status code and data intact.
    pub(crate) fn override_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid location arguments: {0:?}")]
    InvalidLocations(Vec<String>),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArgsError {
    /// The validation failure inside this error, if that is what it is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ArgsError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArgsError>;
