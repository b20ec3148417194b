use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    AppState,
    config::{ApiConfig, StorageBackend},
    routes,
    storage::ImageStore,
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

    info!("Starting API service");

    let config = ApiConfig::load()?;

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
    let redis_pool = RedisPool::new(&RedisConfig::from_env()?)?;
    let images = image_store(&config).await?;

    let app_state = AppState::new(pool, token_service, redis_pool, images);

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state, &config);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn image_store(config: &ApiConfig) -> Result<ImageStore> {
    match config.storage_backend {
        StorageBackend::Local => {
            tokio::fs::create_dir_all(&config.upload_dir)
                .await
                .with_context(|| format!("Failed to create {}", config.upload_dir))?;
            info!("Storing images under {}", config.upload_dir);
            Ok(ImageStore::local(
                &config.upload_dir,
                &config.public_base_url,
                config.max_upload_bytes,
            ))
        }
        StorageBackend::S3 => {
            let bucket = config.s3_bucket.as_deref().context("S3_BUCKET is not set")?;
            let public_url = config
                .s3_public_url
                .as_deref()
                .context("S3_PUBLIC_URL is not set")?;

            let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let client = aws_sdk_s3::Client::new(&aws_config);
            info!("Storing images in S3 bucket {}", bucket);
            Ok(ImageStore::s3(client, bucket, public_url, config.max_upload_bytes))
        }
    }
}
