//! Authentication and authorization module.
//!
//! This module provides:
//! - JWT token issuance and validation against a process-wide secret
//! - The bearer-token auth guard middleware for protected routes
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtConfig, JwtAuth, auth_guard};
//! use core_config::FromEnv;
//!
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config);
//!
//! let protected = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, auth_guard));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::JwtConfig;
pub use jwt::{Claims, JwtAuth};
pub use middleware::auth_guard;
