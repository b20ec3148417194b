//! Service settings
//!
//! Defaults, then an optional `config/auth.toml`, then environment variables
//! (`HOST`, `PORT`, `CORS_ORIGIN`, `LOGIN_MAX_ATTEMPTS`, ...).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS
    pub cors_origin: String,
    pub login_max_attempts: u32,
    pub login_window_seconds: u64,
    pub login_ban_seconds: u64,
}

impl AuthConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("cors_origin", "http://localhost:5173")?
            .set_default("login_max_attempts", 5)?
            .set_default("login_window_seconds", 300)?
            .set_default("login_ban_seconds", 900)?
            .add_source(File::with_name("config/auth").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_limiter(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_attempts: self.login_max_attempts,
            window_seconds: self.login_window_seconds,
            ban_duration_seconds: self.login_ban_seconds,
        }
    }
}
