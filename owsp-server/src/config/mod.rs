//! Configuration module for owsp-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use owsp_core::mail::SmtpConfig;
use owsp_sdk::config::{ProvisioningConfig, ServerConfig, SharedConfig, SiteConfig};
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides `smtp.password`.
pub const SMTP_PASSWORD_ENV: &str = "OWSP_SMTP_PASSWORD";

/// Accepted range for `provisioning.initial_password_length`.
const INITIAL_PASSWORD_LENGTH_RANGE: RangeInclusive<usize> = 8..=64;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub provisioning: ProvisioningConfig,
    pub smtp: SmtpConfig,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    ///
    /// SMTP settings are only needed to build the mailer and are returned
    /// separately.
    pub fn into_shared(self) -> (SharedConfig, SmtpConfig) {
        (
            SharedConfig::new(self.server, self.site, self.provisioning),
            self.smtp,
        )
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI and environment overrides
    /// 3. Validate the configuration
    /// 4. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Ok(password) = std::env::var(SMTP_PASSWORD_ENV) {
            file_config.smtp.password = Some(password);
        }

        validate(&file_config)?;

        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if !config.server.webhook_path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "server.webhook_path must start with '/': {}",
            config.server.webhook_path
        )));
    }
    if config.server.webhook_path == "/health" {
        return Err(ConfigError::ValidationError(
            "server.webhook_path conflicts with the health check route".to_string(),
        ));
    }

    let scheme = config.site.address.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::ValidationError(format!(
            "site.address must be an http(s) URL, got scheme {scheme}"
        )));
    }
    if config.site.name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "site.name must not be empty".to_string(),
        ));
    }

    let length = config.provisioning.initial_password_length;
    if !INITIAL_PASSWORD_LENGTH_RANGE.contains(&length) {
        return Err(ConfigError::ValidationError(format!(
            "provisioning.initial_password_length must be within {}..={}, got {length}",
            INITIAL_PASSWORD_LENGTH_RANGE.start(),
            INITIAL_PASSWORD_LENGTH_RANGE.end()
        )));
    }

    if config.smtp.username.is_some() && config.smtp.password.is_none() {
        return Err(ConfigError::ValidationError(format!(
            "smtp.username is set but no password was given (set smtp.password or {SMTP_PASSWORD_ENV})"
        )));
    }

    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let FileConfig {
        server,
        site,
        provisioning,
        smtp,
    } = file_config;

    let from_name = smtp.from_name.unwrap_or_else(|| site.name.clone());

    LoadedConfig {
        server: ServerConfig {
            listen: server.listen,
            webhook_path: server.webhook_path,
        },
        site: SiteConfig::new(site.name, site.address),
        provisioning: ProvisioningConfig {
            initial_password_length: provisioning.initial_password_length,
        },
        smtp: SmtpConfig {
            host: smtp.host,
            port: smtp.port,
            username: smtp.username,
            password: smtp.password,
            from_address: smtp.from_address,
            from_name,
            use_tls: smtp.use_tls,
        },
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
