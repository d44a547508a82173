use anyhow::{Context, Result};
use std::env;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_JWT_EXPIRATION_SECONDS: i64 = 3600;

/// Process-wide configuration, read once at startup and injected into
/// the services that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_seconds: i64,
}

pub fn load_config() -> Result<AppConfig> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

    let jwt_expiration_seconds =
        i64_from_env("JWT_EXPIRATION_TIME").unwrap_or(DEFAULT_JWT_EXPIRATION_SECONDS);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    Ok(AppConfig {
        database_url,
        host,
        port,
        jwt_secret,
        jwt_expiration_seconds,
    })
}

fn i64_from_env(key: &str) -> Option<i64> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
