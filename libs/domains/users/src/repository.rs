use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::Account;

/// Repository trait for Account persistence.
///
/// Records are keyed by email; `create` is the only write the domain
/// performs (accounts are never updated or deleted).
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Get an account by email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<Account>>;

    /// Create a new account; fails with `DuplicateEmail` when a record
    /// with the same email already exists
    async fn create(&self, account: Account) -> UserResult<Account>;
}

/// In-memory implementation of AccountRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get_by_email(&self, email: &str) -> UserResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(email).cloned())
    }

    async fn create(&self, account: Account) -> UserResult<Account> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.email) {
            return Err(UserError::DuplicateEmail(account.email));
        }

        accounts.insert(account.email.clone(), account.clone());

        tracing::info!(account_id = %account.id, email = %account.email, "Created account");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str) -> Account {
        Account::new(
            email.to_string(),
            "Test".to_string(),
            "User".to_string(),
            "hashed_password".to_string(),
            "tester".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_account() {
        let repo = InMemoryAccountRepository::new();

        let created = repo.create(account("test@example.com")).await.unwrap();
        assert_eq!(created.email, "test@example.com");

        let fetched = repo.get_by_email("test@example.com").await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let repo = InMemoryAccountRepository::new();
        let fetched = repo.get_by_email("nobody@example.com").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryAccountRepository::new();

        repo.create(account("test@example.com")).await.unwrap();

        let result = repo.create(account("test@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }
}
