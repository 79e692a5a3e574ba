//! Account provisioning settings.

/// Length of generated initial passwords unless configured otherwise.
pub const DEFAULT_INITIAL_PASSWORD_LENGTH: usize = 10;

/// Settings applied when a local account is created from a signup event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningConfig {
    /// Number of alphanumeric characters in the generated initial password.
    pub initial_password_length: usize,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            initial_password_length: DEFAULT_INITIAL_PASSWORD_LENGTH,
        }
    }
}
