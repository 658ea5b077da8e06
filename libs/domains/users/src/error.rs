use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::response::error_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UserError::DuplicateEmail(_) => (
                StatusCode::CONFLICT,
                "Account with that email already exists".to_string(),
            ),
            UserError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error, please try again later.".to_string(),
                )
            }
            UserError::Token(msg) => {
                tracing::error!("Token issuance error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error, please try again later.".to_string(),
                )
            }
            UserError::Database(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error, please try again later.".to_string(),
                )
            }
        };

        error_response(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_is_conflict() {
        let response = UserError::DuplicateEmail("a@b.c".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let response = UserError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_store_fault_is_server_error() {
        let response =
            UserError::Database(database::DatabaseError::Generic("boom".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
