use super::{Account, AccountError};
use async_trait::async_trait;

/// Persistent accounts keyed by unique email.
///
/// `create` must refuse a second account for the same email with
/// [`AccountError::EmailInUse`], even when two calls race past `find_by_email`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;

    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, AccountError>;

    async fn ping(&self) -> Result<(), AccountError>;
}
