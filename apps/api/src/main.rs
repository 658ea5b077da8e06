//! Events API - account auth and event management over Redis

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use axum_helpers::auth::JwtAuth;
use axum_helpers::http::{create_cors_layer, create_permissive_cors_layer};
use axum_helpers::server::{create_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{EventService, RedisEventRepository};
use domain_users::{AuthService, RedisAccountRepository};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to Redis at {}", config.redis.url);

    let conn = database::redis::connect_from_config_with_retry(config.redis.clone(), None).await?;

    info!("Successfully connected to Redis");

    let event_repository = RedisEventRepository::new(conn.clone());
    event_repository.ensure_index().await?;

    let jwt = JwtAuth::new(&config.jwt);

    let auth_routes = domain_users::handlers::router(AuthService::new(
        RedisAccountRepository::new(conn.clone()),
        jwt.clone(),
    ));
    let event_routes = domain_events::handlers::router(EventService::new(event_repository), jwt);

    let api_routes = Router::new()
        .route("/", get(welcome))
        .nest("/auth", auth_routes)
        .nest("/events", event_routes);

    let cors = match &config.cors_allowed_origin {
        Some(origin) => create_cors_layer(vec![origin.parse()?]),
        None => create_permissive_cors_layer(),
    };

    let ready_conn = conn.clone();
    let router = Router::new()
        .nest("/api/v1", api_routes)
        .route(
            "/ready",
            get(move || {
                let mut conn = ready_conn.clone();
                async move {
                    match database::redis::check_health(&mut conn).await {
                        Ok(()) => {
                            (StatusCode::OK, Json(json!({"status": "ready"}))).into_response()
                        }
                        Err(e) => {
                            tracing::error!("Readiness check failed: {}", e);
                            (
                                StatusCode::SERVICE_UNAVAILABLE,
                                Json(json!({"status": "unavailable"})),
                            )
                                .into_response()
                        }
                    }
                }
            }),
        )
        .route("/api-docs/openapi.json", get(serve_openapi))
        .merge(health_router(config.app))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("Starting Events API on port {}", config.server.port);

    create_app(router, &config.server).await?;

    Ok(())
}

/// Root greeting for `GET /api/v1`.
async fn welcome() -> &'static str {
    "Welcome to the event management platform built on redis"
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::build())
}
