//! Processors for the signup flow.
//!
//! `SignupProcessor` runs per webhook delivery and hands newly created
//! accounts to `ProvisioningNotifier`. Control only flows downstream.

pub mod notifier;
pub mod signup;

pub use notifier::{AccountProvisioned, ProvisioningNotifier, TOKEN_CONSOLE_PATH, WelcomeMail};
pub use signup::{SignupError, SignupOutcome, SignupProcessor, SignupRejection};
