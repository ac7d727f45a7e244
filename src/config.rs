//! Host configuration.

use crate::consts::embed_consts::server::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required settings were absent from every source.
    #[error("Missing: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Credentials and identifiers needed to mint viewer tokens and embed one dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub instance_url: String,
    pub workspace_id: String,
    pub dashboard_id: String,
    pub service_principal_id: String,
    pub service_principal_secret: String,
    pub external_viewer_id: String,
    pub external_value: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance_url: String::new(),
            workspace_id: String::new(),
            dashboard_id: String::new(),
            service_principal_id: String::new(),
            service_principal_secret: String::new(),
            external_viewer_id: String::new(),
            external_value: String::new(),
            port: DEFAULT_PORT,
        }
    }
}

/// Values supplied on the command line or through the environment.
/// `None` leaves the lower-precedence value untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub instance_url: Option<String>,
    pub workspace_id: Option<String>,
    pub dashboard_id: Option<String>,
    pub service_principal_id: Option<String>,
    pub service_principal_secret: Option<String>,
    pub external_viewer_id: Option<String>,
    pub external_value: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// Fields absent from the file keep their defaults.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Applies higher-precedence values on top of this configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        fn apply(slot: &mut String, value: Option<String>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        apply(&mut self.instance_url, overrides.instance_url);
        apply(&mut self.workspace_id, overrides.workspace_id);
        apply(&mut self.dashboard_id, overrides.dashboard_id);
        apply(&mut self.service_principal_id, overrides.service_principal_id);
        apply(
            &mut self.service_principal_secret,
            overrides.service_principal_secret,
        );
        apply(&mut self.external_viewer_id, overrides.external_viewer_id);
        apply(&mut self.external_value, overrides.external_value);
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// Names (as environment variables) of every required setting that is empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("INSTANCE_URL", &self.instance_url),
            ("DASHBOARD_ID", &self.dashboard_id),
            ("SERVICE_PRINCIPAL_ID", &self.service_principal_id),
            ("SERVICE_PRINCIPAL_SECRET", &self.service_principal_secret),
            ("EXTERNAL_VIEWER_ID", &self.external_viewer_id),
            ("EXTERNAL_VALUE", &self.external_value),
            ("WORKSPACE_ID", &self.workspace_id),
        ];
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if self.port == 0 {
            missing.push("PORT");
        }
        missing
    }

    /// Checks every setting the page host needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check(self.missing_fields())
    }

    /// Checks only what embedding needs when a token is supplied directly.
    pub fn validate_embed_only(&self) -> Result<(), ConfigError> {
        const EMBED_FIELDS: [&str; 3] = ["INSTANCE_URL", "DASHBOARD_ID", "WORKSPACE_ID"];
        Self::check(
            self.missing_fields()
                .into_iter()
                .filter(|name| EMBED_FIELDS.contains(name))
                .collect(),
        )
    }

    fn check(missing: Vec<&'static str>) -> Result<(), ConfigError> {
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    /// Instance URL without a trailing slash, ready for joining endpoint paths.
    pub fn base_url(&self) -> &str {
        self.instance_url.trim_end_matches('/')
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    pub(crate) fn complete_config() -> Config {
        Config {
            instance_url: "https://adb-123.azuredatabricks.net/".to_string(),
            workspace_id: "123".to_string(),
            dashboard_id: "01ef".to_string(),
            service_principal_id: "sp-id".to_string(),
            service_principal_secret: "sp-secret".to_string(),
            external_viewer_id: "viewer@example.com".to_string(),
            external_value: "store-42".to_string(),
            port: 3000,
        }
    }

    #[test]
    // A file with only some fields should load, leaving the rest at defaults.
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{ "instance_url": "https://example.com", "port": 8080 }}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.instance_url, "https://example.com");
        assert_eq!(config.port, 8080);
        assert!(config.dashboard_id.is_empty());
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = complete_config().with_overrides(ConfigOverrides {
            dashboard_id: Some("other".to_string()),
            port: Some(9000),
            ..Default::default()
        });
        assert_eq!(config.dashboard_id, "other");
        assert_eq!(config.port, 9000);
        assert_eq!(config.workspace_id, "123");
    }

    #[test]
    fn test_validate_lists_every_missing_field() {
        let config = Config {
            service_principal_secret: String::new(),
            external_value: "  ".to_string(),
            ..complete_config()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing: SERVICE_PRINCIPAL_SECRET, EXTERNAL_VALUE"
        );
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_embed_only_validation_ignores_credentials() {
        let config = Config {
            service_principal_id: String::new(),
            service_principal_secret: String::new(),
            ..complete_config()
        };
        assert!(config.validate().is_err());
        assert!(config.validate_embed_only().is_ok());

        let config = Config {
            dashboard_id: String::new(),
            ..config
        };
        assert_eq!(
            config.validate_embed_only().unwrap_err().to_string(),
            "Missing: DASHBOARD_ID"
        );
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        assert_eq!(
            complete_config().base_url(),
            "https://adb-123.azuredatabricks.net"
        );
    }
}
