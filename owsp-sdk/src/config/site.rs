//! Public identity of the deployment.

use url::Url;

/// Product name and public base address used in outbound mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Product name shown to users (e.g. in the welcome mail subject).
    pub name: String,
    /// Public base address of the console.
    pub address: Url,
}

impl SiteConfig {
    pub fn new(name: impl Into<String>, address: Url) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }

    /// Build an absolute link by appending `path` to the base address.
    ///
    /// The base address path is preserved, so a deployment under
    /// `https://example.com/api` links to `https://example.com/api{path}`.
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.address.as_str().trim_end_matches('/'), path)
    }
}
