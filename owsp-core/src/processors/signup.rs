//! SignupProcessor.
//!
//! Turns a decoded webhook event into a local account:
//!
//! 1. Ignore any action other than `signup`
//! 2. Reject an empty email
//! 3. Reject an email that is already registered
//! 4. Generate an initial password and insert the account
//! 5. Hand the credentials to the [`ProvisioningNotifier`]
//!
//! Rejections are outcomes, not errors: the sender gets a success status and
//! must not redeliver. Store and mail failures are errors. A mail failure
//! after a successful insert leaves the account in place.

use crate::entities::users::NewUserAccount;
use crate::mail::MailError;
use crate::processors::notifier::{AccountProvisioned, ProvisioningNotifier};
use crate::store::{StoreError, UserStore};
use crate::utils::password::generate_initial_password;
use kanau::processor::Processor;
use owsp_sdk::config::ProvisioningConfig;
use owsp_sdk::objects::{WebhookEvent, WebhookUser};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Result of processing one webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The action was not `signup`; nothing was done.
    Ignored,
    /// The signup was refused for a business reason.
    Rejected(SignupRejection),
    /// The account was created and the welcome mail sent.
    Provisioned { username: String, email: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupRejection {
    EmptyEmail,
    EmailAlreadyRegistered,
}

impl SignupRejection {
    /// Message returned to the webhook sender.
    pub fn message(self) -> &'static str {
        match self {
            SignupRejection::EmptyEmail => "email is empty",
            SignupRejection::EmailAlreadyRegistered => "email already registered",
        }
    }
}

#[derive(Debug, Error)]
pub enum SignupError {
    /// Uniqueness check or insert failed.
    #[error("user store error: {0}")]
    Store(#[source] StoreError),

    /// The account exists but the welcome mail was not delivered.
    #[error("welcome mail error: {0}")]
    Notify(#[from] MailError),
}

/// Provisions local accounts from signup events.
///
/// Built per request with a snapshot of the provisioning settings.
pub struct SignupProcessor {
    pub store: Arc<dyn UserStore>,
    pub notifier: ProvisioningNotifier,
    pub config: ProvisioningConfig,
}

impl Processor<WebhookEvent> for SignupProcessor {
    type Output = SignupOutcome;
    type Error = SignupError;

    async fn process(&self, event: WebhookEvent) -> Result<SignupOutcome, SignupError> {
        if !event.is_signup() {
            info!(
                action = %event.action,
                message = %event.message,
                "Received non-signup webhook event, ignoring"
            );
            return Ok(SignupOutcome::Ignored);
        }

        let WebhookUser { name, email } = event.user;
        info!(username = %name, email = %email, "Received signup event");

        if email.is_empty() {
            warn!(username = %name, "Signup event has an empty email");
            return Ok(SignupOutcome::Rejected(SignupRejection::EmptyEmail));
        }

        if self
            .store
            .email_taken(&email)
            .await
            .map_err(SignupError::Store)?
        {
            warn!(email = %email, "Email already registered");
            return Ok(SignupOutcome::Rejected(
                SignupRejection::EmailAlreadyRegistered,
            ));
        }

        let initial_password = generate_initial_password(self.config.initial_password_length);
        let account = NewUserAccount::common(name.clone(), email.clone(), initial_password.clone());

        match self.store.insert(account).await {
            Ok(()) => {}
            Err(StoreError::EmailTaken) => {
                // Another delivery for the same email won the insert.
                warn!(email = %email, "Email registered concurrently");
                return Ok(SignupOutcome::Rejected(
                    SignupRejection::EmailAlreadyRegistered,
                ));
            }
            Err(e) => return Err(SignupError::Store(e)),
        }
        info!(username = %name, email = %email, "Local account created");

        self.notifier
            .process(AccountProvisioned {
                email: email.clone(),
                initial_password,
            })
            .await?;

        Ok(SignupOutcome::Provisioned {
            username: name,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::users::{UserRole, UserStatus};
    use crate::testing::{InMemoryUserStore, RecordingMailer};
    use owsp_sdk::config::SiteConfig;
    use url::Url;

    struct Harness {
        store: Arc<InMemoryUserStore>,
        mailer: Arc<RecordingMailer>,
    }

    impl Harness {
        fn new(store: InMemoryUserStore, mailer: RecordingMailer) -> Self {
            Self {
                store: Arc::new(store),
                mailer: Arc::new(mailer),
            }
        }

        fn processor(&self) -> SignupProcessor {
            SignupProcessor {
                store: self.store.clone(),
                notifier: ProvisioningNotifier::new(
                    self.mailer.clone(),
                    SiteConfig::new("New API", Url::parse("https://api.example.com").unwrap()),
                ),
                config: ProvisioningConfig::default(),
            }
        }
    }

    fn event(action: &str, name: &str, email: &str) -> WebhookEvent {
        WebhookEvent {
            action: action.to_string(),
            message: String::new(),
            user: WebhookUser {
                name: name.to_string(),
                email: email.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_non_signup_event_is_ignored() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::new());

        for action in ["login", "", "SIGNUP", "signup "] {
            let outcome = h.processor().process(event(action, "alice", "a@x.com")).await;
            assert_eq!(outcome.unwrap(), SignupOutcome::Ignored);
        }

        assert_eq!(h.store.email_taken_calls(), 0);
        assert_eq!(h.store.insert_calls(), 0);
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_empty_email_is_rejected_without_side_effects() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::new());

        let outcome = h.processor().process(event("signup", "alice", "")).await;

        assert_eq!(
            outcome.unwrap(),
            SignupOutcome::Rejected(SignupRejection::EmptyEmail)
        );
        assert_eq!(h.store.email_taken_calls(), 0);
        assert_eq!(h.store.insert_calls(), 0);
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_existing_email_is_rejected() {
        let h = Harness::new(
            InMemoryUserStore::new().with_email("a@x.com"),
            RecordingMailer::new(),
        );

        let outcome = h.processor().process(event("signup", "alice", "a@x.com")).await;

        assert_eq!(
            outcome.unwrap(),
            SignupOutcome::Rejected(SignupRejection::EmailAlreadyRegistered)
        );
        assert_eq!(h.store.email_taken_calls(), 1);
        assert_eq!(h.store.insert_calls(), 0);
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_new_email_is_provisioned_and_notified() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::new());

        let outcome = h.processor().process(event("signup", "alice", "a@x.com")).await;

        assert_eq!(
            outcome.unwrap(),
            SignupOutcome::Provisioned {
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
            }
        );

        let accounts = h.store.accounts();
        assert_eq!(accounts.len(), 1);
        let account = &accounts[0];
        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.role, UserRole::Common);
        assert_eq!(account.status, UserStatus::Enabled);
        assert_eq!(account.password.len(), 10);
        assert!(account.password.chars().all(|c| c.is_ascii_alphanumeric()));

        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert!(sent[0].html_body.contains(&account.password));
        assert!(
            sent[0]
                .html_body
                .contains("https://api.example.com/console/token")
        );
    }

    #[tokio::test]
    async fn test_configured_password_length_is_used() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::new());
        let mut processor = h.processor();
        processor.config.initial_password_length = 24;

        processor
            .process(event("signup", "alice", "a@x.com"))
            .await
            .unwrap();

        assert_eq!(h.store.accounts()[0].password.len(), 24);
    }

    #[tokio::test]
    async fn test_second_identical_signup_is_rejected() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::new());

        let first = h.processor().process(event("signup", "alice", "a@x.com")).await;
        let second = h.processor().process(event("signup", "alice", "a@x.com")).await;

        assert!(matches!(first.unwrap(), SignupOutcome::Provisioned { .. }));
        assert_eq!(
            second.unwrap(),
            SignupOutcome::Rejected(SignupRejection::EmailAlreadyRegistered)
        );
        assert_eq!(h.store.insert_calls(), 1);
        assert_eq!(h.mailer.attempts(), 1);
    }

    #[tokio::test]
    async fn test_insert_conflict_is_rejected_not_duplicated() {
        // The existence check misses an account inserted concurrently.
        let h = Harness::new(
            InMemoryUserStore::new().with_email("a@x.com").racing(),
            RecordingMailer::new(),
        );

        let outcome = h.processor().process(event("signup", "alice", "a@x.com")).await;

        assert_eq!(
            outcome.unwrap(),
            SignupOutcome::Rejected(SignupRejection::EmailAlreadyRegistered)
        );
        assert_eq!(h.store.insert_calls(), 1);
        assert_eq!(h.store.accounts().len(), 1);
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_signups_create_one_account() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::new());

        let (first, second) = (h.processor(), h.processor());
        let (a, b) = tokio::join!(
            first.process(event("signup", "alice", "a@x.com")),
            second.process(event("signup", "alice", "a@x.com")),
        );

        let outcomes = [a.unwrap(), b.unwrap()];
        let provisioned = outcomes
            .iter()
            .filter(|o| matches!(o, SignupOutcome::Provisioned { .. }))
            .count();
        assert_eq!(provisioned, 1);
        assert!(outcomes.contains(&SignupOutcome::Rejected(
            SignupRejection::EmailAlreadyRegistered
        )));
        assert_eq!(h.store.accounts().len(), 1);
        assert_eq!(h.mailer.attempts(), 1);
    }

    #[tokio::test]
    async fn test_insert_failure_is_an_error() {
        let h = Harness::new(InMemoryUserStore::new().failing_inserts(), RecordingMailer::new());

        let result = h.processor().process(event("signup", "alice", "a@x.com")).await;

        assert!(matches!(result, Err(SignupError::Store(StoreError::Database(_)))));
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_account() {
        let h = Harness::new(InMemoryUserStore::new(), RecordingMailer::failing());

        let result = h.processor().process(event("signup", "alice", "a@x.com")).await;

        assert!(matches!(result, Err(SignupError::Notify(_))));
        assert_eq!(h.store.accounts().len(), 1);
        assert_eq!(h.mailer.attempts(), 1);
    }
}
