//! Service settings
//!
//! Defaults, then an optional `config/api.toml`, then environment variables
//! (`HOST`, `PORT`, `UPLOAD_DIR`, `STORAGE_BACKEND`, ...).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Where uploaded images are written
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS
    pub cors_origin: String,
    /// Prefix for image URLs served from the local upload tree
    pub public_base_url: String,
    pub upload_dir: String,
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_public_url: Option<String>,
    /// Per file
    pub max_upload_bytes: usize,
    /// Whole multipart body
    pub max_request_bytes: usize,
}

impl ApiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config: ApiConfig = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .set_default("cors_origin", "http://localhost:5173")?
            .set_default("public_base_url", "http://localhost:3001")?
            .set_default("upload_dir", "uploads")?
            .set_default("storage_backend", "local")?
            .set_default("max_upload_bytes", 5 * 1024 * 1024)?
            .set_default("max_request_bytes", 25 * 1024 * 1024)?
            .add_source(File::with_name("config/api").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_backend == StorageBackend::S3 {
            if self.s3_bucket.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Message(
                    "S3_BUCKET must be set when STORAGE_BACKEND=s3".into(),
                ));
            }
            if self.s3_public_url.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Message(
                    "S3_PUBLIC_URL must be set when STORAGE_BACKEND=s3".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
