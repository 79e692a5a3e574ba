//! Application state shared across all request handlers.

use owsp_core::mail::Mailer;
use owsp_core::store::UserStore;
use owsp_sdk::config::SharedConfig;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (site and provisioning sections reload on SIGHUP).
    pub config: SharedConfig,
    /// Local account storage.
    pub store: Arc<dyn UserStore>,
    /// Outbound mail transport.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create a new AppState from its collaborators.
    pub fn new(config: SharedConfig, store: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            store,
            mailer,
        }
    }
}
