//! Account model and the signup/login flows.
//!
//! Both flows are an ordered chain of checks returning [`AccountError`] on the
//! first failure. The store and hasher are injected through [`Accounts::new`] so the
//! HTTP layer never reaches for a global connection.

pub mod hasher;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod validate;

pub use self::hasher::{Bcrypt, PasswordHasher};
pub use self::memory::MemoryAccountStore;
pub use self::postgres::PgAccountStore;
pub use self::store::AccountStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Persisted identity record.
///
/// `password_hash` goes over the wire as `password`, which is how the record has
/// always been laid out. It is never the plaintext.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Request body shared by signup and login.
#[derive(ToSchema, Serialize, Deserialize, Default, Clone)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Broad class of an [`AccountError`]. Clients only ever see the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Internal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("All fields must be filled")]
    MissingFields,
    #[error("Email not valid")]
    InvalidEmail,
    #[error("Password not strong enough")]
    WeakPassword,
    #[error("Email already in use")]
    EmailInUse,
    #[error("Incorrect email")]
    IncorrectEmail,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("{0}")]
    Store(String),
    #[error("{0}")]
    Hasher(String),
}

impl AccountError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields | Self::InvalidEmail | Self::WeakPassword | Self::EmailInUse => {
                ErrorKind::Validation
            }
            Self::IncorrectEmail | Self::IncorrectPassword => ErrorKind::Auth,
            Self::Store(_) | Self::Hasher(_) => ErrorKind::Internal,
        }
    }
}

/// Signup and login over an injected store and hasher.
#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounts").finish_non_exhaustive()
    }
}

impl Accounts {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Validate the credentials, hash the password and create the account.
    ///
    /// # Errors
    /// Returns the first failing check, in order: missing fields, email grammar,
    /// password strength, email already in use. Store and hasher failures are
    /// returned as-is.
    #[instrument(skip(self))]
    pub async fn signup(&self, credentials: &Credentials) -> Result<Account, AccountError> {
        let (email, password) = validate::signup(credentials)?;

        // fast path, the UNIQUE constraint catches concurrent signups
        if self.store.find_by_email(email).await?.is_some() {
            debug!("signup rejected, email already registered");
            return Err(AccountError::EmailInUse);
        }

        let password_hash = self.hasher.hash(password).await?;

        let account = self.store.create(email, &password_hash).await?;

        debug!(account.id = %account.id, "account created");

        Ok(account)
    }

    /// Look up the account and verify the password against its stored hash.
    ///
    /// # Errors
    /// Returns [`AccountError::MissingFields`], [`AccountError::IncorrectEmail`] or
    /// [`AccountError::IncorrectPassword`], or a store/hasher failure.
    #[instrument(skip(self))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Account, AccountError> {
        let (email, password) = validate::login(credentials)?;

        let Some(account) = self.store.find_by_email(email).await? else {
            debug!("login rejected, unknown email");
            return Err(AccountError::IncorrectEmail);
        };

        if !self.hasher.verify(password, &account.password_hash).await? {
            debug!(account.id = %account.id, "login rejected, password mismatch");
            return Err(AccountError::IncorrectPassword);
        }

        Ok(account)
    }

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    /// Returns [`AccountError::Store`] when it is not.
    pub async fn ping(&self) -> Result<(), AccountError> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> Accounts {
        Accounts::new(
            Arc::new(MemoryAccountStore::default()),
            Arc::new(Bcrypt::new(4)),
        )
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn signup_then_login_round_trip() {
        let accounts = accounts();
        let credentials = Credentials::new("a@b.com", "Str0ng!Pass");

        let created = accounts.signup(&credentials).await.unwrap();

        assert_eq!(created.email, "a@b.com");
        assert_ne!(created.password_hash, "Str0ng!Pass");
        assert_eq!(
            Bcrypt::new(4).verify("Str0ng!Pass", &created.password_hash).await,
            Ok(true)
        );

        let logged_in = accounts.login(&credentials).await;
        assert_eq!(logged_in, Ok(created));
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let accounts = accounts();
        let credentials = Credentials::new("dup@example.com", "Str0ng!Pass");

        assert!(accounts.signup(&credentials).await.is_ok());
        assert_eq!(
            accounts.signup(&credentials).await,
            Err(AccountError::EmailInUse)
        );
    }

    #[tokio::test]
    async fn signup_checks_run_in_order() {
        let accounts = accounts();

        // invalid email and weak password: email is reported first
        assert_eq!(
            accounts
                .signup(&Credentials::new("not-an-email", "weak"))
                .await,
            Err(AccountError::InvalidEmail)
        );
        assert_eq!(
            accounts.signup(&Credentials::new("a@b.com", "weak")).await,
            Err(AccountError::WeakPassword)
        );
        assert_eq!(
            accounts.signup(&Credentials::default()).await,
            Err(AccountError::MissingFields)
        );
    }

    #[tokio::test]
    async fn login_unknown_email() {
        let accounts = accounts();
        assert_eq!(
            accounts
                .login(&Credentials::new("nobody@example.com", "Str0ng!Pass"))
                .await,
            Err(AccountError::IncorrectEmail)
        );
    }

    #[tokio::test]
    async fn login_wrong_password() {
        let accounts = accounts();
        assert!(accounts
            .signup(&Credentials::new("a@b.com", "Str0ng!Pass"))
            .await
            .is_ok());

        assert_eq!(
            accounts
                .login(&Credentials::new("a@b.com", "Wr0ng!Pass"))
                .await,
            Err(AccountError::IncorrectPassword)
        );
    }

    #[tokio::test]
    async fn login_does_not_check_password_strength() {
        let accounts = accounts();
        // login only checks presence, so a weak password is an auth failure
        assert_eq!(
            accounts.login(&Credentials::new("whatever", "weak")).await,
            Err(AccountError::IncorrectEmail)
        );
    }

    #[test]
    fn error_kinds() {
        assert_eq!(AccountError::MissingFields.kind(), ErrorKind::Validation);
        assert_eq!(AccountError::EmailInUse.kind(), ErrorKind::Validation);
        assert_eq!(AccountError::IncorrectEmail.kind(), ErrorKind::Auth);
        assert_eq!(AccountError::IncorrectPassword.kind(), ErrorKind::Auth);
        assert_eq!(
            AccountError::Store("down".to_string()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            AccountError::MissingFields.to_string(),
            "All fields must be filled"
        );
        assert_eq!(AccountError::InvalidEmail.to_string(), "Email not valid");
        assert_eq!(
            AccountError::WeakPassword.to_string(),
            "Password not strong enough"
        );
        assert_eq!(AccountError::EmailInUse.to_string(), "Email already in use");
        assert_eq!(AccountError::IncorrectEmail.to_string(), "Incorrect email");
        assert_eq!(
            AccountError::IncorrectPassword.to_string(),
            "Incorrect password"
        );
        assert_eq!(
            AccountError::Store("pool timed out".to_string()).to_string(),
            "pool timed out"
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("a@b.com", "Str0ng!Pass"));
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("Str0ng!Pass"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn account_serializes_hash_as_password() {
        let account = Account {
            id: Uuid::nil(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["password"], "$2b$10$hash");
        assert!(json.get("password_hash").is_none());
    }
}
