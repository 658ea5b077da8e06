//! Users Domain
//!
//! Account signup and login against the Redis-backed credential store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (signup, login)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← password hashing, token issuance
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← account records keyed by email (trait + impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Account entity, request/response DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::auth::{JwtAuth, JwtConfig};
//! use domain_users::{handlers, repository::InMemoryAccountRepository, service::AuthService};
//!
//! let repository = InMemoryAccountRepository::new();
//! let jwt = JwtAuth::new(&JwtConfig::new("a-development-secret-of-32-chars!!"));
//! let service = AuthService::new(repository, jwt);
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod redis_repository;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{Account, LoginRequest, SignupRequest, TokenData};
pub use redis_repository::RedisAccountRepository;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::AuthService;
