//! In-memory [`UserStore`] and [`Mailer`] for tests.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the server crate's HTTP tests.

use crate::entities::users::NewUserAccount;
use crate::mail::{MailError, Mailer};
use crate::store::{StoreError, UserStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A user store that keeps accounts in a vector.
///
/// `insert` enforces email uniqueness the way the database unique index does.
#[derive(Default)]
pub struct InMemoryUserStore {
    accounts: Mutex<Vec<NewUserAccount>>,
    email_taken_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    racing: bool,
    failing_inserts: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account with this email.
    pub fn with_email(self, email: &str) -> Self {
        lock(&self.accounts).push(NewUserAccount::common(
            "existing".to_string(),
            email.to_string(),
            "existing-password".to_string(),
        ));
        self
    }

    /// Make `email_taken` always answer `false`, as if a concurrent insert
    /// landed between the check and the insert.
    pub fn racing(mut self) -> Self {
        self.racing = true;
        self
    }

    /// Make every insert fail with a connectivity error.
    pub fn failing_inserts(mut self) -> Self {
        self.failing_inserts = true;
        self
    }

    pub fn accounts(&self) -> Vec<NewUserAccount> {
        lock(&self.accounts).clone()
    }

    pub fn email_taken_calls(&self) -> usize {
        self.email_taken_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn email_taken(&self, email: &str) -> Result<bool, StoreError> {
        self.email_taken_calls.fetch_add(1, Ordering::SeqCst);
        if self.racing {
            return Ok(false);
        }
        Ok(lock(&self.accounts).iter().any(|a| a.email == email))
    }

    async fn insert(&self, account: NewUserAccount) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_inserts {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut accounts = lock(&self.accounts);
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::EmailTaken);
        }
        accounts.push(account);
        Ok(())
    }
}

/// A mail delivered to [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub subject: String,
    pub to: String,
    pub html_body: String,
}

/// A mailer that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    attempts: AtomicUsize,
    failing: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        lock(&self.sent).clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, to: &str, html_body: &str) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(MailError::Send("connection refused".to_string()));
        }
        lock(&self.sent).push(SentMail {
            subject: subject.to_string(),
            to: to.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}
