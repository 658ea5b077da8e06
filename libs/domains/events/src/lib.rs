//! Events Domain
//!
//! Event creation and the indexed listing/search queries: all events,
//! by owner, within a radius, and by category or title.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (create, list, locations, search)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← pagination, filter dispatch, ownership stamping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← indexed event records (trait + impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Event entity, index schema, request DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::auth::{JwtAuth, JwtConfig};
//! use domain_events::{handlers, repository::InMemoryEventRepository, service::EventService};
//!
//! let repository = InMemoryEventRepository::new();
//! let jwt = JwtAuth::new(&JwtConfig::new("a-development-secret-of-32-chars!!"));
//! let service = EventService::new(repository);
//!
//! let router = handlers::router(service, jwt);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod redis_repository;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{EventError, EventResult};
pub use models::{CreateEvent, Event, GeoPoint, LocationParams};
pub use redis_repository::RedisEventRepository;
pub use repository::{EventFilter, EventRepository, InMemoryEventRepository};
pub use service::{EventPage, EventService, DEFAULT_RADIUS_KM};
