//! Configuration validation.

use crate::error::{AdapterError, Result};

use super::types::AdapterConfig;

/// Validate a loaded configuration.
pub fn validate(config: &AdapterConfig) -> Result<()> {
    if config.connection.database.is_empty() {
        return Err(AdapterError::Config(
            "connection.database must not be empty".to_string(),
        ));
    }

    if config.connection.user.is_empty() {
        return Err(AdapterError::Config(
            "connection.user must not be empty".to_string(),
        ));
    }

    if config.connection.port == 0 {
        return Err(AdapterError::Config(
            "connection.port must not be 0".to_string(),
        ));
    }

    if config.owner.is_empty() {
        return Err(AdapterError::Config(
            "owner must not be empty".to_string(),
        ));
    }

    Ok(())
}
