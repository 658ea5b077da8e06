//! Configuration for the events API

use axum_helpers::auth::JwtConfig;
use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use database::redis::RedisConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub environment: Environment,
    /// Restrict CORS to this origin; permissive when unset
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let redis = RedisConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;

        let cors_allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN").ok();

        Ok(Self {
            app: app_info!(),
            redis,
            server,
            jwt,
            environment,
            cors_allowed_origin,
        })
    }
}
