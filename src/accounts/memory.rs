//! Process-local store, used by tests and for running without a database.

use super::{Account, AccountError, AccountStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, AccountError> {
        match self.accounts.write().await.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AccountError::EmailInUse),
            Entry::Vacant(slot) => {
                let account = Account {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                Ok(slot.insert(account).clone())
            }
        }
    }

    async fn ping(&self) -> Result<(), AccountError> {
        Ok(())
    }
}
