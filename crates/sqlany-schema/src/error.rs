//! Error types for the schema adapter.

use thiserror::Error;

/// Main error type for catalog introspection and DDL operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument, rejected before any statement is issued
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Catalog query or statement execution failed in the data-access layer
    #[error("Data access error: {message}\n  Context: {context}")]
    DataAccess { message: String, context: String },

    /// A catalog row did not contain an expected column
    #[error("Catalog row has no column '{0}'")]
    MissingColumn(String),

    /// A catalog value had an unexpected type
    #[error("Catalog column '{column}' holds {found}, expected {expected}")]
    Decode {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// No rule in the type mapper chain applied to an abstract type
    #[error("No native type mapping for abstract type '{0}'")]
    UnsupportedType(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AdapterError {
    /// Create a DataAccess error with context about where it occurred.
    pub fn data_access(message: impl Into<String>, context: impl Into<String>) -> Self {
        AdapterError::DataAccess {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a Decode error for a column holding the wrong value type.
    pub fn decode(column: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        AdapterError::Decode {
            column: column.into(),
            expected,
            found,
        }
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
