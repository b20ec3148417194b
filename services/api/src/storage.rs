//! Image storage for product and profile pictures
//!
//! Files land either under the local upload tree (served at `/uploads`) or in
//! an S3 bucket. Only the generated file name is persisted; the folder is
//! implied by the owning entity.

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use aws_sdk_s3::{Client, primitives::ByteStream};
use axum::body::Bytes;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

const MAX_NAME_LEN: usize = 100;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

/// Sub-folder an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Products,
    Users,
}

impl Folder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Products => "products",
            Folder::Users => "users",
        }
    }
}

/// A file part read from a multipart body
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub bytes: Bytes,
}

enum Backend {
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    S3 {
        client: Client,
        bucket: String,
        public_url: String,
    },
}

#[derive(Clone)]
pub struct ImageStore {
    backend: Arc<Backend>,
    max_bytes: usize,
}

impl ImageStore {
    pub fn local(root: impl Into<PathBuf>, public_base_url: &str, max_bytes: usize) -> Self {
        Self {
            backend: Arc::new(Backend::Local {
                root: root.into(),
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
            }),
            max_bytes,
        }
    }

    pub fn s3(client: Client, bucket: &str, public_url: &str, max_bytes: usize) -> Self {
        Self {
            backend: Arc::new(Backend::S3 {
                client,
                bucket: bucket.to_string(),
                public_url: public_url.trim_end_matches('/').to_string(),
            }),
            max_bytes,
        }
    }

    /// Local upload root, when files are kept on disk
    pub fn local_root(&self) -> Option<&Path> {
        match self.backend.as_ref() {
            Backend::Local { root, .. } => Some(root),
            Backend::S3 { .. } => None,
        }
    }

    /// Check an upload before anything is written
    pub fn validate(&self, upload: &Upload) -> Result<(), String> {
        let sanitized = sanitize_file_name(&upload.file_name);
        let extension = extension(&sanitized);
        if !extension.is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext)) {
            return Err(format!(
                "Only {} images are allowed",
                ALLOWED_EXTENSIONS.join(", ")
            ));
        }
        if upload.bytes.is_empty() {
            return Err("File is empty".to_string());
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(format!(
                "File must not exceed {} bytes",
                self.max_bytes
            ));
        }
        Ok(())
    }

    /// Write the upload and return the generated file name
    pub async fn store(&self, folder: Folder, upload: &Upload) -> Result<String, StorageError> {
        let name = stored_name(&upload.file_name);

        match self.backend.as_ref() {
            Backend::Local { root, .. } => {
                let dir = root.join(folder.as_str());
                tokio::fs::create_dir_all(&dir).await?;
                tokio::fs::write(dir.join(&name), &upload.bytes).await?;
            }
            Backend::S3 { client, bucket, .. } => {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(format!("{}/{}", folder.as_str(), name))
                    .body(ByteStream::from(upload.bytes.clone()))
                    .content_type(content_type(&name))
                    .send()
                    .await
                    .map_err(|e| StorageError::S3(e.to_string()))?;
            }
        }

        info!("Stored image {}/{}", folder.as_str(), name);
        Ok(name)
    }

    /// Store every upload; on failure the ones already written are removed
    pub async fn store_all(
        &self,
        folder: Folder,
        uploads: &[&Upload],
    ) -> Result<Vec<String>, StorageError> {
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.store(folder, upload).await {
                Ok(name) => stored.push(name),
                Err(e) => {
                    self.discard(folder, &stored).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    pub async fn remove(&self, folder: Folder, name: &str) -> Result<(), StorageError> {
        match self.backend.as_ref() {
            Backend::Local { root, .. } => {
                tokio::fs::remove_file(root.join(folder.as_str()).join(name)).await?;
            }
            Backend::S3 { client, bucket, .. } => {
                client
                    .delete_object()
                    .bucket(bucket)
                    .key(format!("{}/{}", folder.as_str(), name))
                    .send()
                    .await
                    .map_err(|e| StorageError::S3(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Best-effort removal; failures are only logged
    pub async fn discard(&self, folder: Folder, names: &[String]) {
        for name in names {
            if let Err(e) = self.remove(folder, name).await {
                warn!("Failed to remove image {}/{}: {}", folder.as_str(), name, e);
            }
        }
    }

    pub fn public_url(&self, folder: Folder, name: &str) -> String {
        match self.backend.as_ref() {
            Backend::Local {
                public_base_url, ..
            } => format!("{}/uploads/{}/{}", public_base_url, folder.as_str(), name),
            Backend::S3 { public_url, .. } => {
                format!("{}/{}/{}", public_url, folder.as_str(), name)
            }
        }
    }
}

/// `<unix-micros>-<seq>-<sanitized name>`
pub fn stored_name(original: &str) -> String {
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_micros(),
        SEQUENCE.fetch_add(1, Ordering::Relaxed),
        sanitize_file_name(original)
    )
}

/// Strip directories, keep `[a-z0-9._-]`, lowercase
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '.' | '-' | '_' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '_',
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    let cleaned = if cleaned.len() > MAX_NAME_LEN {
        match cleaned.rsplit_once('.') {
            Some((stem, ext)) if ext.len() < 10 => {
                format!("{}.{}", &stem[..MAX_NAME_LEN - ext.len() - 1], ext)
            }
            _ => cleaned[..MAX_NAME_LEN].to_string(),
        }
    } else {
        cleaned.to_string()
    };

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

fn content_type(name: &str) -> &'static str {
    match extension(name) {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
