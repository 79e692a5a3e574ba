//! Configuration types for the signup provisioner.
//!
//! These types represent the validated runtime configuration used by the server
//! and can be shared across crates. The actual config loading/parsing is handled
//! by the server crate.

mod provisioning;
mod server;
mod site;

pub use provisioning::{DEFAULT_INITIAL_PASSWORD_LENGTH, ProvisioningConfig};
pub use server::ServerConfig;
pub use site::SiteConfig;

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Shared configuration state with separate locks for each section.
///
/// This allows independent access to different configuration sections
/// without blocking other readers/writers.
#[derive(Clone)]
pub struct SharedConfig {
    /// Server configuration (listen address, webhook route).
    pub server: Arc<RwLock<ServerConfig>>,
    /// Product name and public address.
    pub site: Arc<RwLock<SiteConfig>>,
    /// Account provisioning settings.
    pub provisioning: Arc<RwLock<ProvisioningConfig>>,
}

impl SharedConfig {
    /// Create a new SharedConfig from individual configuration parts.
    pub fn new(server: ServerConfig, site: SiteConfig, provisioning: ProvisioningConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            site: Arc::new(RwLock::new(site)),
            provisioning: Arc::new(RwLock::new(provisioning)),
        }
    }

    /// Get a read lock on the server configuration.
    pub async fn server(&self) -> RwLockReadGuard<'_, ServerConfig> {
        self.server.read().await
    }

    /// Get a read lock on the site configuration.
    pub async fn site(&self) -> RwLockReadGuard<'_, SiteConfig> {
        self.site.read().await
    }

    /// Copy out the current provisioning settings.
    pub async fn provisioning(&self) -> ProvisioningConfig {
        *self.provisioning.read().await
    }

    /// Replace the sections that may change while the server runs.
    ///
    /// The listen address and webhook route are bound at startup and are
    /// left untouched.
    pub async fn update_reloadable(&self, site: SiteConfig, provisioning: ProvisioningConfig) {
        *self.site.write().await = site;
        *self.provisioning.write().await = provisioning;
    }
}
