//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

impl AdapterConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AdapterConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
connection:
  host: db.internal
  port: 2638
  database: app
  user: dba
  password: secret_password
owner: APP
"#;

    #[test]
    fn test_from_yaml() {
        let config = AdapterConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.connection.host, "db.internal");
        assert_eq!(config.connection.database, "app");
        assert_eq!(config.owner, "APP");
    }

    #[test]
    fn test_defaults_applied() {
        let config = AdapterConfig::from_yaml(
            "connection:\n  database: app\n  user: dba\n  password: x\n",
        )
        .unwrap();
        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, 2638);
        assert_eq!(config.owner, "DBA");
    }

    #[test]
    fn test_validation_rejects_empty_database() {
        let result = AdapterConfig::from_yaml(
            "connection:\n  database: \"\"\n  user: dba\n  password: x\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_password_not_serialized() {
        let config = AdapterConfig::from_yaml(SAMPLE).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(
            !yaml.contains("secret_password"),
            "Password was serialized: {}",
            yaml
        );
    }
}
