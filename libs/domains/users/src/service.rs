use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum_helpers::auth::JwtAuth;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{Account, LoginRequest, SignupRequest};
use crate::repository::AccountRepository;

/// Service layer for signup/login: salted one-way password hashing plus
/// bearer-token issuance for the authenticated account.
pub struct AuthService<R: AccountRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: AccountRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Register a new account and return its bearer token.
    ///
    /// Fails with `DuplicateEmail` when an account already exists for
    /// the email.
    pub async fn register(&self, input: SignupRequest) -> UserResult<String> {
        let password_hash = self.hash_password(&input.password)?;

        let account = Account::new(
            input.email,
            input.first_name,
            input.last_name,
            password_hash,
            input.display_name,
        );

        let created = self.repository.create(account).await?;
        self.issue_token(&created)
    }

    /// Verify credentials and return a fresh bearer token.
    ///
    /// A missing account and a wrong password both surface as
    /// `InvalidCredentials`; the caller cannot tell which failed.
    pub async fn login(&self, input: LoginRequest) -> UserResult<String> {
        let account = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(&input.password, &account.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        self.issue_token(&account)
    }

    fn issue_token(&self, account: &Account) -> UserResult<String> {
        self.jwt
            .issue(&account.key(), &account.id.to_string())
            .map_err(|e| UserError::Token(e.to_string()))
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
