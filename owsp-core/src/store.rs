//! The user store seam used by signup processing.
//!
//! [`UserStore`] is the only shared mutable resource in the signup flow. The
//! Postgres implementation on [`DatabaseProcessor`] hashes the initial
//! password and relies on the unique index on `users.email`, reporting a
//! violation as [`StoreError::EmailTaken`].

use crate::entities::users::{InsertUserAccount, IsEmailTaken, NewUserAccount};
use crate::framework::DatabaseProcessor;
use crate::utils::password::{PasswordError, hash_password};
use async_trait::async_trait;
use kanau::processor::Processor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The email is already used by another account.
    #[error("email already registered")]
    EmailTaken,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("password hashing task failed: {0}")]
    HashTask(#[from] tokio::task::JoinError),
}

/// Hash on the blocking pool so argon2 does not stall request workers.
async fn hash_off_runtime(password: String) -> Result<String, StoreError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
    Ok(hash)
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether an account with this email exists.
    async fn email_taken(&self, email: &str) -> Result<bool, StoreError>;

    /// Persist a new account.
    async fn insert(&self, account: NewUserAccount) -> Result<(), StoreError>;
}

#[async_trait]
impl UserStore for DatabaseProcessor {
    async fn email_taken(&self, email: &str) -> Result<bool, StoreError> {
        let taken = self
            .process(IsEmailTaken {
                email: email.to_owned(),
            })
            .await?;
        Ok(taken)
    }

    async fn insert(&self, account: NewUserAccount) -> Result<(), StoreError> {
        let password_hash = hash_off_runtime(account.password).await?;
        let result = self
            .process(InsertUserAccount {
                username: account.username,
                email: account.email,
                role: account.role,
                status: account.status,
                password_hash,
            })
            .await;

        match result {
            Ok(created) => {
                tracing::debug!(user_id = created.id, "User account inserted");
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }
}
