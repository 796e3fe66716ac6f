//! HTTP client for the storage object endpoint.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use doclib_core::config::StorageConfig;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

use crate::Credentials;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid storage URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for uploaded objects.
///
/// `object_path` is relative to the bucket, e.g. `en/proof-of-loss.pdf`.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    async fn put_object(&self, object_path: &str, bytes: Vec<u8>) -> Result<(), SyncError>;
}

/// Client for `POST <base>/storage/v1/object/<bucket>/<object_path>`.
pub struct StorageClient {
    client: reqwest::Client,
    base_url: Url,
    bucket: String,
    content_type: String,
    token: String,
}

impl StorageClient {
    /// Create a client for the given credentials.
    ///
    /// Requests have no timeout unless `storage.request_timeout_secs` is set.
    pub fn new(credentials: &Credentials, storage: &StorageConfig) -> Result<Self, SyncError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = storage.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let invalid = |reason: String| SyncError::InvalidUrl {
            url: credentials.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(&credentials.base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
            bucket: storage.bucket.clone(),
            content_type: storage.content_type.clone(),
            token: credentials.token().to_string(),
        })
    }

    /// Endpoint URL for one object. Each `/`-separated part of
    /// `object_path` is percent-encoded as its own path segment, so names
    /// containing `#`, `?` or spaces reach the server intact.
    pub fn object_url(&self, object_path: &str) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object", self.bucket.as_str()])
                .extend(object_path.split('/'));
        }
        url
    }

    /// Upload raw bytes. Only 200 and 201 count as success.
    pub async fn upload(&self, object_path: &str, bytes: Vec<u8>) -> Result<u16, SyncError> {
        let url = self.object_url(object_path);
        debug!(url = %url, size = bytes.len(), "uploading object");
        let resp = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, &self.content_type)
            .body(bytes)
            .send()
            .await?;
        let status = resp.status().as_u16();
        if !matches!(status, 200 | 201) {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server { status, body });
        }
        Ok(status)
    }
}

#[async_trait]
impl ObjectSink for StorageClient {
    async fn put_object(&self, object_path: &str, bytes: Vec<u8>) -> Result<(), SyncError> {
        self.upload(object_path, bytes).await.map(|_| ())
    }
}
