//! Redis connector and utilities
//!
//! Provides connection management, health checks, and a query layer for
//! RediSearch-backed secondary indexes.

mod config;
mod connector;
mod health;
pub mod search;

pub use config::RedisConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry, connect_with_retry};
pub use health::check_health;
pub use search::{Filter, IndexField, IndexSchema, SearchDoc, SearchQuery, SearchReply};

// Re-export redis types for convenience
pub use redis::aio::ConnectionManager;
pub use redis::{AsyncCommands, Client, RedisResult};
