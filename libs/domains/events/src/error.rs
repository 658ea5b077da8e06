use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::response::error_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

pub type EventResult<T> = Result<T, EventError>;

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            EventError::NotFound => (StatusCode::NOT_FOUND, "Event not found.".to_string()),
            EventError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            EventError::Database(e) => {
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
