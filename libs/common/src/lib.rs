//! Common library for the coffee shop admin backend
//!
//! This crate provides shared functionality used by the auth and admin
//! services: database connectivity and migrations, the Redis client, error
//! classification, the response envelope, password hashing and session
//! tokens.

pub mod cache;
pub mod database;
pub mod error;
pub mod extract;
pub mod password;
pub mod response;
pub mod role;
pub mod token;
pub mod validation;

/// Example usage of the database module
///
/// ```rust,no_run
/// use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_env()?;
///     let pool = init_pool(&config).await?;
///     run_migrations(&pool).await?;
///     println!("Database health check: {}", health_check(&pool).await?);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
