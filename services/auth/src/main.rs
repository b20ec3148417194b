use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{
    AppState, config::AuthConfig, rate_limiter::RateLimiter, repositories::UserRepository, routes,
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    token::{TokenConfig, TokenService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    let config = AuthConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    database::run_migrations(&pool).await?;

    let token_service = TokenService::new(TokenConfig::from_env()?);

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;

    let app_state = AppState {
        user_repository: UserRepository::new(pool),
        token_service,
        redis_pool,
        rate_limiter: RateLimiter::new(config.rate_limiter()),
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state, &config.cors_origin);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Authentication service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
