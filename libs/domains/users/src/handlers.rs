//! HTTP endpoints for account signup and login.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use axum_helpers::{response::ApiResponse, ValidatedJson};

use crate::models::{LoginRequest, SignupRequest, TokenData};
use crate::repository::AccountRepository;
use crate::service::AuthService;

/// OpenAPI definitions for the auth endpoints.
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(signup, login),
    components(schemas(SignupRequest, LoginRequest, TokenData))
)]
pub struct ApiDoc;

/// Build the auth router: `POST /signup` and `POST /login`.
pub fn router<R: AccountRepository + 'static>(service: AuthService<R>) -> Router {
    Router::new()
        .route("/signup", post(signup::<R>))
        .route("/login", post(login::<R>))
        .with_state(service)
}

/// Create an account and return a bearer token for it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<TokenData>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "auth"
)]
async fn signup<R: AccountRepository>(
    State(service): State<AuthService<R>>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> impl IntoResponse {
    match service.register(payload).await {
        Ok(token) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(
                "Account successfully created",
                TokenData { token },
            )),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Verify credentials and return a fresh bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenData>),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
async fn login<R: AccountRepository>(
    State(service): State<AuthService<R>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    match service.login(payload).await {
        Ok(token) => {
            Json(ApiResponse::ok("Login successful", TokenData { token })).into_response()
        }
        Err(e) => e.into_response(),
    }
}
