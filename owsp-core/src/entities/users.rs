use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// Role of a local account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "user_role")]
pub enum UserRole {
    Common,
    Admin,
    Root,
}

/// Whether a local account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "user_status")]
pub enum UserStatus {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: time::PrimitiveDateTime,
}

/// A local account about to be created.
///
/// `password` is the plaintext initial password; the store hashes it before
/// anything is persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub password: String,
}

impl NewUserAccount {
    /// An enabled, non-privileged account.
    pub fn common(username: String, email: String, password: String) -> Self {
        Self {
            username,
            email,
            role: UserRole::Common,
            status: UserStatus::Enabled,
            password,
        }
    }
}

impl std::fmt::Debug for NewUserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUserAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("status", &self.status)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
/// Check whether any account already uses this email.
pub struct IsEmailTaken {
    pub email: String,
}

impl Processor<IsEmailTaken> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:IsEmailTaken")]
    async fn process(&self, query: IsEmailTaken) -> Result<bool, sqlx::Error> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE email = $1
            )
            "#,
        )
        .bind(query.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }
}

#[derive(Debug, Clone)]
/// Insert a new account with an already hashed password.
///
/// Fails with a unique violation when the email is taken; the `users.email`
/// unique index is what guarantees uniqueness across concurrent signups.
pub struct InsertUserAccount {
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub password_hash: String,
}

impl Processor<InsertUserAccount> for DatabaseProcessor {
    type Output = UserAccount;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertUserAccount")]
    async fn process(&self, insert: InsertUserAccount) -> Result<UserAccount, sqlx::Error> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (username, email, role, status, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
            id,
            username,
            email,
            role,
            status,
            created_at
            "#,
        )
        .bind(insert.username)
        .bind(insert.email)
        .bind(insert.role)
        .bind(insert.status)
        .bind(insert.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }
}
