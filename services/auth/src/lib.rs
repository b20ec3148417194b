//! Authentication service: registration, login and logout

pub mod config;
pub mod error;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;

use common::{cache::RedisPool, token::TokenService};

use crate::{rate_limiter::RateLimiter, repositories::UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub token_service: TokenService,
    pub redis_pool: RedisPool,
    pub rate_limiter: RateLimiter,
}
