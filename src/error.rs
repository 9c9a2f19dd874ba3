//! Error types for confident.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for confident operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while building a configuration object.
///
/// Every variant is raised synchronously out of the build call. The only
/// failure the engine swallows is a best-effort literal parse of a string
/// value, which falls back to the raw string.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Contradictory or incomplete setup of the sources.
    #[error("{0}")]
    Configuration(String),

    /// A map entry name does not exist in the resolved map document.
    #[error("No matching map config to map_name='{map_name}'. Check your `config_map`.")]
    MapEntryNotFound {
        /// Entry name that was looked up.
        map_name: String,
    },

    /// A resolved map selector value is not a string.
    #[error("map_field='{field}' is not valid. Value has to be <str> not \"{value}\" type={type_name}")]
    InvalidSelector {
        /// The selector field name.
        field: String,
        /// The offending value, rendered as JSON.
        value: String,
        /// The JSON type of the offending value.
        type_name: &'static str,
    },

    /// A file that must be loaded does not exist.
    #[error("path='{}' is not exists.", .0.display())]
    FileNotFound(PathBuf),

    /// The file extension is not a supported document format.
    #[error("path='{}' is not a supported file. Supported: .json, .yaml, .yml", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The document decoded, but its top level is not a key/value mapping.
    #[error("path='{}' has to have a valid dict content.", .0.display())]
    InvalidContent(PathBuf),

    /// The document could not be decoded.
    #[error("Failed to parse '{}': {message}", .path.display())]
    ParseError {
        /// Path of the document.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The merged fields could not be deserialized into the target type.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::ParseError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Validation error raised by user validation hooks.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}
