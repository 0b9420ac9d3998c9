//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Top-level adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Connection settings handed to the external data-access layer.
    pub connection: ConnectionConfig,

    /// Default owner used to scope catalog lookups when a table name is
    /// not owner-qualified.
    #[serde(default = "default_owner")]
    pub owner: String,
}

/// Connection settings for the engine.
///
/// The adapter itself never opens connections; these values are consumed
/// by whatever implements the `Executor` trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database server host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Database server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// User name.
    pub user: String,

    /// Password. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,
}

fn default_owner() -> String {
    "DBA".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    2638
}
