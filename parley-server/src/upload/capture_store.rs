use crate::config::UploadConfig;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture is empty")]
    Empty,

    #[error("failed to persist capture: {0}")]
    Io(#[from] std::io::Error),
}

/// A capture that has been persisted and can be fetched again.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCapture {
    pub name: String,
    pub url: String,
}

/// Durable storage for recorded captures.
#[async_trait]
pub trait CaptureStore: Send + Sync {
    async fn store(&self, filename: &str, data: Bytes) -> Result<StoredCapture, CaptureError>;
}

/// Writes captures into a local directory served under `/captures`.
pub struct LocalCaptureStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalCaptureStore {
    /// Creates the upload directory if it does not exist yet.
    pub async fn open(config: &UploadConfig) -> Result<Self, CaptureError> {
        tokio::fs::create_dir_all(&config.upload_dir).await?;

        Ok(Self {
            dir: config.upload_dir.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl CaptureStore for LocalCaptureStore {
    async fn store(&self, filename: &str, data: Bytes) -> Result<StoredCapture, CaptureError> {
        if data.is_empty() {
            return Err(CaptureError::Empty);
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = format!("{}-{}", millis, sanitize_filename(filename));

        tokio::fs::write(self.dir.join(&name), &data).await?;
        info!("Stored capture {} ({} bytes)", name, data.len());

        Ok(StoredCapture {
            url: format!("{}/captures/{}", self.public_base_url, name),
            name,
        })
    }
}

/// Keeps only the final path component and a conservative character set.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "capture".to_owned()
    } else {
        cleaned.to_owned()
    }
}
