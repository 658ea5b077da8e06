//! JWT configuration, loaded the same way as the other `FromEnv` configs.

use core_config::{env_or_default, env_required, ConfigError, FromEnv};

/// Default token lifetime in seconds (1 hour)
pub const DEFAULT_TOKEN_EXPIRATION_SECS: i64 = 3600;

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - at least 32 characters
/// - `TOKEN_EXPIRATION_SECS` (optional) - token lifetime, default 3600
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// JWT signing secret (minimum 32 characters)
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_secs: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig with the given secret and the default
    /// expiration.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            expiration_secs: DEFAULT_TOKEN_EXPIRATION_SECS,
        }
    }

    pub fn with_expiration(mut self, expiration_secs: i64) -> Self {
        self.expiration_secs = expiration_secs;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let expiration_secs = env_or_default(
            "TOKEN_EXPIRATION_SECS",
            &DEFAULT_TOKEN_EXPIRATION_SECS.to_string(),
        )
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "TOKEN_EXPIRATION_SECS".to_string(),
            details: format!("{}", e),
        })?;

        Ok(Self {
            secret,
            expiration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_new_valid() {
        let secret = "this-is-a-valid-secret-with-32-chars!";
        let config = JwtConfig::new(secret);
        assert_eq!(config.secret, secret);
        assert_eq!(config.expiration_secs, DEFAULT_TOKEN_EXPIRATION_SECS);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("this-is-a-valid-secret-with-32-chars!")),
                ("TOKEN_EXPIRATION_SECS", Some("120")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, "this-is-a-valid-secret-with-32-chars!");
                assert_eq!(config.expiration_secs, 120);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let config = JwtConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_secret_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let config = JwtConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_default_expiration() {
        temp_env::with_vars(
            [
                (
                    "JWT_SECRET",
                    Some("this-is-a-valid-secret-with-32-chars!"),
                ),
                ("TOKEN_EXPIRATION_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.expiration_secs, DEFAULT_TOKEN_EXPIRATION_SECS);
            },
        );
    }
}
