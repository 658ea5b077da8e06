use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;

use crate::error::{UserError, UserResult};
use crate::models::{account_key, Account};
use crate::repository::AccountRepository;

/// Account repository over Redis hashes at `user:<email>`.
///
/// Reads are `HGETALL`. Creation reserves the key with `HSETNX` on the
/// `email` field, so concurrent signups for the same email resolve to
/// exactly one account.
#[derive(Clone)]
pub struct RedisAccountRepository {
    conn: ConnectionManager,
}

impl RedisAccountRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl AccountRepository for RedisAccountRepository {
    async fn get_by_email(&self, email: &str) -> UserResult<Option<Account>> {
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = conn
            .hgetall(account_key(email))
            .await
            .map_err(database::DatabaseError::from)?;

        if fields.is_empty() {
            return Ok(None);
        }

        match Account::from_field_map(&fields) {
            Some(account) => Ok(Some(account)),
            None => Err(UserError::Database(database::DatabaseError::CorruptRecord {
                key: account_key(email),
                details: "account hash is missing required fields".to_string(),
            })),
        }
    }

    async fn create(&self, account: Account) -> UserResult<Account> {
        let mut conn = self.conn.clone();

        // HSETNX reserves the record key atomically; the loser of a
        // concurrent signup race sees the field already set and reads
        // it as a duplicate.
        let reserved: bool = conn
            .hset_nx(account.key(), "email", &account.email)
            .await
            .map_err(database::DatabaseError::from)?;

        if !reserved {
            return Err(UserError::DuplicateEmail(account.email));
        }

        let fields = account.to_field_map();
        conn.hset_multiple::<_, _, _, ()>(account.key(), &fields)
            .await
            .map_err(database::DatabaseError::from)?;

        tracing::info!(account_id = %account.id, email = %account.email, "Created account");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn account(email: &str) -> Account {
        Account::new(
            email.to_string(),
            "Test".to_string(),
            "User".to_string(),
            "$argon2id$fake".to_string(),
            "tester".to_string(),
        )
    }

    #[tokio::test]
    #[ignore] // Requires actual Redis
    async fn test_concurrent_signups_create_one_account() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let conn = database::redis::connect(&redis_url).await.unwrap();
        let repo = RedisAccountRepository::new(conn);

        let email = format!("race-{}@example.com", Uuid::now_v7());
        let (first, second) = tokio::join!(
            repo.create(account(&email)),
            repo.create(account(&email))
        );

        assert!(first.is_ok() ^ second.is_ok());

        let stored = repo.get_by_email(&email).await.unwrap().unwrap();
        assert_eq!(stored.email, email);
    }
}
