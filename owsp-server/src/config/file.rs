//! TOML file configuration structures.
//!
//! These structs directly map to the `owsp-config.toml` file format.

use owsp_sdk::config::DEFAULT_INITIAL_PASSWORD_LENGTH;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    pub smtp: SmtpConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Route Open WebUI posts its webhook to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default address")
}

fn default_webhook_path() -> String {
    "/webhooks/open-webui".to_string()
}

/// Site identity section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Product name used in the welcome mail.
    pub name: String,
    /// Public base address of the console (e.g. "https://api.example.com").
    pub address: Url,
}

/// Account provisioning section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Length of the generated initial password.
    #[serde(default = "default_initial_password_length")]
    pub initial_password_length: usize,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            initial_password_length: default_initial_password_length(),
        }
    }
}

fn default_initial_password_length() -> usize {
    DEFAULT_INITIAL_PASSWORD_LENGTH
}

/// Outbound SMTP section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    /// May be left out and supplied through `OWSP_SMTP_PASSWORD` instead.
    pub password: Option<String>,
    pub from_address: String,
    /// Sender display name. Defaults to the site name.
    pub from_name: Option<String>,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"
webhook_path = "/hooks/signup"

[site]
name = "New API"
address = "https://api.example.com"

[provisioning]
initial_password_length = 16

[smtp]
host = "smtp.example.com"
port = 465
username = "noreply@example.com"
password = "secret"
from_address = "noreply@example.com"
from_name = "New API"
use_tls = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.server.webhook_path, "/hooks/signup");
        assert_eq!(config.site.name, "New API");
        assert_eq!(config.site.address.host_str(), Some("api.example.com"));
        assert_eq!(config.provisioning.initial_password_length, 16);
        assert_eq!(config.smtp.port, 465);
        assert!(!config.smtp.use_tls);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml_str = r#"
[site]
name = "New API"
address = "https://api.example.com"

[smtp]
host = "smtp.example.com"
from_address = "noreply@example.com"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.server.webhook_path, "/webhooks/open-webui");
        assert_eq!(config.provisioning.initial_password_length, 10);
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.use_tls);
        assert!(config.smtp.password.is_none());
        assert!(config.smtp.from_name.is_none());
    }

    #[test]
    fn test_invalid_site_address_fails_to_parse() {
        let toml_str = r#"
[site]
name = "New API"
address = "not a url"

[smtp]
host = "smtp.example.com"
from_address = "noreply@example.com"
"#;
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }
}
