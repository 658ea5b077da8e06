//! The wire envelope shared by every endpoint: `{error, message, data}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

/// Success envelope. `data` is omitted when there is no payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Build an error response with the uniform `{error:true, message}` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": true,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let response = ApiResponse::ok("done", json!({"token": "abc"}));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"], false);
        assert_eq!(value["message"], "done");
        assert_eq!(value["data"]["token"], "abc");
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let response = ApiResponse::message("pong");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"], false);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::UNAUTHORIZED, "Unauthorized user.");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
