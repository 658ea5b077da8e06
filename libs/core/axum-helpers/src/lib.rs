//! # Axum Helpers
//!
//! Utilities, middleware, and helpers shared across Axum services.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT token issuance/validation and the bearer auth guard
//! - **[`pagination`]**: page/limit query coercion and offset math
//! - **[`response`]**: the `{error, message, data}` response envelope
//! - **[`extractors`]**: validated JSON extractor
//! - **[`http`]**: CORS layers
//! - **[`server`]**: server bootstrap with graceful shutdown, health routes

pub mod auth;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod response;
pub mod server;

// Re-export auth types
pub use auth::{auth_guard, Claims, JwtAuth, JwtConfig};

// Re-export pagination helpers
pub use pagination::{prepare_pagination, total_pages, PageParams, Pagination};

// Re-export the response envelope
pub use response::{error_response, ApiResponse};

// Re-export extractors
pub use extractors::ValidatedJson;

// Re-export HTTP middleware
pub use http::{create_cors_layer, create_permissive_cors_layer};

// Re-export server helpers
pub use server::{create_app, health_router, shutdown_signal, HealthResponse};
