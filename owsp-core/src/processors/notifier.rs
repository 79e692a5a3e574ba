//! ProvisioningNotifier processor.
//!
//! Sends the welcome mail for a freshly provisioned account. The mail carries
//! the plaintext initial password and a link to the token console where the
//! user creates API tokens. Delivery is attempted once; a failure is returned
//! to the caller and the account is left in place.

use crate::mail::{MailError, Mailer};
use kanau::processor::Processor;
use owsp_sdk::config::SiteConfig;
use std::sync::Arc;

/// Console page linked from the welcome mail.
pub const TOKEN_CONSOLE_PATH: &str = "/console/token";

/// An account was created and its owner needs their credentials.
#[derive(Clone)]
pub struct AccountProvisioned {
    pub email: String,
    pub initial_password: String,
}

/// Subject and HTML body of the welcome mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMail {
    pub subject: String,
    pub html_body: String,
}

impl WelcomeMail {
    pub fn compose(site: &SiteConfig, email: &str, initial_password: &str) -> Self {
        let product = &site.name;
        let link = site.link(TOKEN_CONSOLE_PATH);
        let html_body = format!(
            "<p>Hello, welcome to {product}!</p>\
             <p>Your account details:<br>\
             Account: {email}<br>\
             Initial password: {initial_password}</p>\
             <p>Click <a href='{link}'>here</a> to add your API tokens.</p>\
             <p>If the link does not work, copy this address into your browser:<br>{link}</p>"
        );

        Self {
            subject: format!("Welcome to {product}"),
            html_body,
        }
    }
}

/// Composes and dispatches welcome mails.
///
/// `site` is a snapshot taken when the notifier is built, so a configuration
/// reload never changes a mail halfway through a request.
pub struct ProvisioningNotifier {
    mailer: Arc<dyn Mailer>,
    site: SiteConfig,
}

impl ProvisioningNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, site: SiteConfig) -> Self {
        Self { mailer, site }
    }
}

impl Processor<AccountProvisioned> for ProvisioningNotifier {
    type Output = ();
    type Error = MailError;

    #[tracing::instrument(skip_all, err, fields(to = %event.email))]
    async fn process(&self, event: AccountProvisioned) -> Result<(), MailError> {
        let mail = WelcomeMail::compose(&self.site, &event.email, &event.initial_password);
        self.mailer
            .send(&mail.subject, &event.email, &mail.html_body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingMailer;
    use url::Url;

    fn site() -> SiteConfig {
        SiteConfig::new("New API", Url::parse("https://api.example.com/").unwrap())
    }

    #[test]
    fn test_compose_welcome_mail() {
        let mail = WelcomeMail::compose(&site(), "a@x.com", "Ab3dE6gH9j");

        assert_eq!(mail.subject, "Welcome to New API");
        assert!(mail.html_body.contains("welcome to New API"));
        assert!(mail.html_body.contains("a@x.com"));
        assert!(mail.html_body.contains("Ab3dE6gH9j"));
        assert_eq!(
            mail.html_body
                .matches("https://api.example.com/console/token")
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_sends_one_mail_to_account_email() {
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = ProvisioningNotifier::new(mailer.clone(), site());

        notifier
            .process(AccountProvisioned {
                email: "a@x.com".to_string(),
                initial_password: "Ab3dE6gH9j".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, "Welcome to New API");
        assert!(sent[0].html_body.contains("Ab3dE6gH9j"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let mailer = Arc::new(RecordingMailer::failing());
        let notifier = ProvisioningNotifier::new(mailer.clone(), site());

        let result = notifier
            .process(AccountProvisioned {
                email: "a@x.com".to_string(),
                initial_password: "Ab3dE6gH9j".to_string(),
            })
            .await;

        assert!(matches!(result, Err(MailError::Send(_))));
        assert_eq!(mailer.attempts(), 1);
    }
}
