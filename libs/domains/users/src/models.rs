use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Store key for an account record: `user:<email>`.
pub fn account_key(email: &str) -> String {
    format!("user:{}", email)
}

/// Account entity, stored as a hash keyed by email.
///
/// Accounts are created on signup and never updated or deleted; at most
/// one account exists per email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique, time-ordered identifier (UUIDv7)
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique key of the record
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
}

impl Account {
    /// Create a new account (password must already be hashed).
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
        display_name: String,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            first_name,
            last_name,
            email,
            password_hash,
            display_name,
        }
    }

    /// Store key of this record.
    pub fn key(&self) -> String {
        account_key(&self.email)
    }

    /// Hash field layout persisted under `user:<email>`.
    pub fn to_field_map(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("firstName", self.first_name.clone()),
            ("lastName", self.last_name.clone()),
            ("email", self.email.clone()),
            ("password", self.password_hash.clone()),
            ("displayName", self.display_name.clone()),
        ]
    }

    /// Rebuild an account from its stored hash fields.
    pub fn from_field_map(fields: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            id: fields.get("id")?.parse().ok()?,
            first_name: fields.get("firstName")?.clone(),
            last_name: fields.get("lastName")?.clone(),
            email: fields.get("email")?.clone(),
            password_hash: fields.get("password")?.clone(),
            display_name: fields.get("displayName")?.clone(),
        })
    }
}

/// DTO for account signup
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

/// DTO for login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Payload carrying an issued bearer token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenData {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(
            "alice@example.com".to_string(),
            "Alice".to_string(),
            "Doe".to_string(),
            "$argon2id$fake".to_string(),
            "alice".to_string(),
        )
    }

    #[test]
    fn test_account_key() {
        assert_eq!(account().key(), "user:alice@example.com");
    }

    #[test]
    fn test_field_map_round_trip() {
        let original = account();
        let map: HashMap<String, String> = original
            .to_field_map()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let restored = Account::from_field_map(&map).unwrap();
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.email, original.email);
        assert_eq!(restored.password_hash, original.password_hash);
        assert_eq!(restored.display_name, original.display_name);
    }

    #[test]
    fn test_from_field_map_rejects_partial_record() {
        let mut map = HashMap::new();
        map.insert("email".to_string(), "alice@example.com".to_string());
        assert!(Account::from_field_map(&map).is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let value = serde_json::to_value(account()).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["email"], "alice@example.com");
    }
}
