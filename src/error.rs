use thiserror::Error;

/// Errors that can occur while computing plot metrics.
#[derive(Error, Debug)]
pub enum ForestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error in '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ForestError {
    /// Build a validation error for the named input field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ForestError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending field, for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ForestError::ValidationError { field, .. } => Some(field),
            _ => None,
        }
    }
}
