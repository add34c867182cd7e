//! Configuration Module
//!
//! Destination and logging configuration for the relay. Loaded from a YAML
//! file with environment-variable overrides; credential fields are opaque to
//! the core and are only handed to whatever concrete sink the embedder
//! constructs.

use crate::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Destination store identity and credentials.
///
/// Field set mirrors the app-setting bindings of the hosting runtime; none
/// of these are interpreted by the relay itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination account endpoint
    #[serde(default)]
    pub account_fqdn: String,
    /// Application identity used to authenticate
    #[serde(default)]
    pub application_id: String,
    /// Client secret for the application identity
    #[serde(default)]
    pub client_secret: String,
    /// Tenant the application identity belongs to
    #[serde(default)]
    pub tenant_id: String,
    /// Root segment prefixed to every destination path
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Watched source container
    #[serde(default = "default_container")]
    pub container: String,
}

fn default_root_path() -> String {
    crate::sink::DEFAULT_ROOT_PATH.to_string()
}

fn default_container() -> String {
    "insights-logs-webapplicationfirewalllogs".to_string()
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            account_fqdn: String::new(),
            application_id: String::new(),
            client_secret: String::new(),
            tenant_id: String::new(),
            root_path: default_root_path(),
            container: default_container(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Top-level relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub destination: DestinationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RelayError::ConfigError(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config: RelayConfig = serde_yaml::from_str(&contents)?;
        debug!("Loaded configuration from {:?}", path);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-variable overrides (`WAF_RELAY_*`).
    ///
    /// Mirrors the `%setting%` indirection of the hosting runtime: any
    /// credential or path field may be supplied at deploy time without
    /// touching the config file.
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 6] = [
            ("WAF_RELAY_ACCOUNT_FQDN", &mut self.destination.account_fqdn),
            (
                "WAF_RELAY_APPLICATION_ID",
                &mut self.destination.application_id,
            ),
            (
                "WAF_RELAY_CLIENT_SECRET",
                &mut self.destination.client_secret,
            ),
            ("WAF_RELAY_TENANT_ID", &mut self.destination.tenant_id),
            ("WAF_RELAY_ROOT_PATH", &mut self.destination.root_path),
            ("WAF_RELAY_CONTAINER", &mut self.destination.container),
        ];
        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                debug!("Overriding {} from environment", var);
                *field = value;
            }
        }
        if let Ok(level) = std::env::var("WAF_RELAY_LOG_LEVEL") {
            self.logging.log_level = level;
        }
    }

    /// Load from file, then apply environment overrides
    pub fn load_with_env(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_inner()
            .map_err(RelayError::ConfigError)
    }

    fn validate_inner(&self) -> std::result::Result<(), String> {
        if !self.destination.root_path.starts_with('/') {
            return Err(format!(
                "Destination root path must start with '/', got {:?}",
                self.destination.root_path
            ));
        }

        if self.destination.container.is_empty() {
            return Err("Source container cannot be empty".to_string());
        }

        // Credentials are all-or-nothing: a partially configured identity
        // will only fail later inside the destination client.
        let credentials = [
            ("account_fqdn", &self.destination.account_fqdn),
            ("application_id", &self.destination.application_id),
            ("client_secret", &self.destination.client_secret),
            ("tenant_id", &self.destination.tenant_id),
        ];
        let any_set = credentials.iter().any(|(_, v)| !v.is_empty());
        if any_set {
            for (field, value) in credentials {
                if value.is_empty() {
                    return Err(format!(
                        "Destination credential field '{}' is empty while others are set",
                        field
                    ));
                }
            }
        } else {
            warn!("No destination credentials configured; sink must be pre-authenticated");
        }

        Ok(())
    }
}
