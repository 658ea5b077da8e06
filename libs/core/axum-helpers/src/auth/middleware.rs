use super::jwt::JwtAuth;
use crate::response::error_response;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Extract the bearer credential from a request.
///
/// Takes the full token substring after the `Bearer ` scheme prefix in
/// the `Authorization` header, falling back to a `token` query parameter
/// when the header is absent.
fn extract_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            request.uri().query().and_then(|query| {
                query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("token=").map(|s| s.to_string()))
            })
        })
}

/// Bearer-token auth guard.
///
/// Validates the token via [`JwtAuth`] and inserts the [`Claims`] into
/// request extensions for downstream handlers. Requests with no token or
/// a failing token are rejected with 401 and never reach the handler.
///
/// [`Claims`]: super::jwt::Claims
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/events/users", get(list_user_events))
///     .route_layer(axum::middleware::from_fn_with_state(auth.clone(), auth_guard));
/// ```
pub async fn auth_guard(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_token(&request) {
        Some(t) => t,
        None => {
            tracing::debug!("No bearer token in Authorization header or token parameter");
            return Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized user."));
        }
    };

    let claims = match auth.validate(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            return Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized user."));
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str, auth_header: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_full_token_after_scheme() {
        let req = request("/events/users", Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&req), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_falls_back_to_query_parameter() {
        let req = request("/events/users?token=abc.def.ghi&page=2", None);
        assert_eq!(extract_token(&req), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_prefers_header_over_query() {
        let req = request("/events/users?token=from-query", Some("Bearer from-header"));
        assert_eq!(extract_token(&req), Some("from-header".to_string()));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        let req = request("/events/users", Some("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_token(&req), None);
    }

    #[test]
    fn test_extract_none_when_absent() {
        let req = request("/events/users?page=1", None);
        assert_eq!(extract_token(&req), None);
    }
}
