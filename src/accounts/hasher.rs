use super::AccountError;
use async_trait::async_trait;
use tokio::task;
use tracing::{error, instrument};

/// One-way salted password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, AccountError>;

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AccountError>;
}

/// `bcrypt` with a fixed cost, run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct Bcrypt {
    cost: u32,
}

impl Bcrypt {
    pub const DEFAULT_COST: u32 = 10;

    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for Bcrypt {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for Bcrypt {
    #[instrument(skip_all, fields(cost = self.cost))]
    async fn hash(&self, plaintext: &str) -> Result<String, AccountError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                AccountError::Hasher(e.to_string())
            })?
            .map_err(|e| {
                error!("Error hashing password: {}", e);
                AccountError::Hasher(e.to_string())
            })
    }

    #[instrument(skip_all)]
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AccountError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| {
                error!("Password verification task failed: {}", e);
                AccountError::Hasher(e.to_string())
            })?
            .map_err(|e| {
                error!("Error verifying password: {}", e);
                AccountError::Hasher(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cost_is_ten() {
        assert_eq!(Bcrypt::default().cost(), 10);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn hash_is_salted_and_verifies() {
        let hasher = Bcrypt::new(4);

        let first = hasher.hash("Str0ng!Pass").await.unwrap();
        let second = hasher.hash("Str0ng!Pass").await.unwrap();

        assert_ne!(first, "Str0ng!Pass");
        assert_ne!(first, second);
        assert!(first.starts_with("$2b$04$"));

        assert_eq!(hasher.verify("Str0ng!Pass", &first).await, Ok(true));
        assert_eq!(hasher.verify("Str0ng!Pass", &second).await, Ok(true));
        assert_eq!(hasher.verify("wrong", &first).await, Ok(false));
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn hash_records_cost() {
        let hash = Bcrypt::default().hash("Str0ng!Pass").await.unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[tokio::test]
    async fn invalid_cost_is_an_error() {
        let result = Bcrypt::new(2).hash("Str0ng!Pass").await;
        assert!(matches!(result, Err(AccountError::Hasher(_))));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let result = Bcrypt::new(4).verify("Str0ng!Pass", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(AccountError::Hasher(_))));
    }
}
