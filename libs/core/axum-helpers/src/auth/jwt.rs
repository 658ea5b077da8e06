use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::config::JwtConfig;

/// JWT claims: the store key and id of the authenticated account, plus
/// the standard expiry/issued-at timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Store key of the account record (e.g. `user:alice@example.com`)
    #[serde(rename = "userKey")]
    pub user_key: String,
    /// Account id
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Expiration time (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

/// Stateless token service: signs and verifies bearer tokens with a
/// process-wide secret and a fixed expiration duration.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    expiration_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            expiration_secs: config.expiration_secs,
        }
    }

    /// Sign a claim for the given account, valid for the configured
    /// expiration duration.
    pub fn issue(&self, user_key: &str, user_id: &str) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_key: user_key.to_string(),
            user_id: user_id.to_string(),
            exp: (now + Duration::seconds(self.expiration_secs)).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify signature and expiration, returning the embedded claims.
    ///
    /// Fails on malformed tokens, bad signatures, and expired tokens; it
    /// never panics on untrusted input.
    pub fn validate(&self, token: &str) -> eyre::Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-0123456789"))
    }

    #[test]
    fn test_issue_validate_round_trip() {
        let auth = test_auth();

        let token = auth.issue("user:alice@example.com", "account-1").unwrap();
        let claims = auth.validate(&token).unwrap();

        assert_eq!(claims.user_key, "user:alice@example.com");
        assert_eq!(claims.user_id, "account-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_rejects_tampered_token() {
        let auth = test_auth();

        let token = auth.issue("user:alice@example.com", "account-1").unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('x') { 'y' } else { 'x' });

        assert!(auth.validate(&tampered).is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_token() {
        let auth = test_auth();
        assert!(auth.validate("not-a-jwt").is_err());
        assert!(auth.validate("").is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let auth = test_auth();
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-long-enough-42!"));

        let token = other.issue("user:alice@example.com", "account-1").unwrap();
        assert!(auth.validate(&token).is_err());
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let auth = test_auth();

        let now = Utc::now();
        let claims = Claims {
            user_key: "user:alice@example.com".to_string(),
            user_id: "account-1".to_string(),
            exp: (now - Duration::seconds(120)).timestamp(),
            iat: (now - Duration::seconds(240)).timestamp(),
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret-that-is-long-enough-0123456789".as_bytes()),
        )
        .unwrap();

        assert!(auth.validate(&expired).is_err());
    }

    #[test]
    fn test_claims_wire_field_names() {
        let claims = Claims {
            user_key: "user:a@b.c".to_string(),
            user_id: "id-1".to_string(),
            exp: 2,
            iat: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userKey"], "user:a@b.c");
        assert_eq!(json["userId"], "id-1");
    }
}
