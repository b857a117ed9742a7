use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tokio::io::AsyncReadExt;
use tracing::info;

use super::error::StorageError;
use super::key::BlobKey;
use super::traits::{BlobStore, BoxReader};
use crate::config::S3StorageConfig;

/// Blob store backed by an S3-compatible bucket.
///
/// The handle is stateless apart from connection settings and can be shared
/// across requests.
pub struct S3BlobStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    path_style: bool,
    max_size: u64,
}

impl S3BlobStore {
    pub fn new(config: &S3StorageConfig, max_size: u64) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(backend)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            region,
            credentials,
            path_style: config.path_style,
            max_size,
        })
    }

    fn object_path(key: &BlobKey) -> String {
        format!("/{}", key.object_name())
    }
}

fn backend(err: s3::error::S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn unexpected_status(op: &str, key: &BlobKey, status: u16) -> StorageError {
    StorageError::Backend(format!("{op} {key} returned HTTP {status}"))
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn ensure_bucket_exists(&self) -> Result<(), StorageError> {
        if self.bucket.exists().await.map_err(backend)? {
            return Ok(());
        }

        let name = self.bucket.name();
        let response = if self.path_style {
            Bucket::create_with_path_style(
                &name,
                self.region.clone(),
                self.credentials.clone(),
                BucketConfiguration::default(),
            )
            .await
        } else {
            Bucket::create(
                &name,
                self.region.clone(),
                self.credentials.clone(),
                BucketConfiguration::default(),
            )
            .await
        }
        .map_err(backend)?;

        if !response.success() {
            return Err(StorageError::Backend(format!(
                "failed to create bucket {name}: HTTP {} {}",
                response.response_code, response.response_text
            )));
        }

        info!(bucket = %name, "Created object storage bucket");
        Ok(())
    }

    async fn put_stream(&self, key: &BlobKey, reader: BoxReader) -> Result<u64, StorageError> {
        // Read one byte past the limit so oversized payloads are detected without
        // buffering them entirely.
        let mut buf = Vec::new();
        reader
            .take(self.max_size.saturating_add(1))
            .read_to_end(&mut buf)
            .await?;

        let size = buf.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let response = self
            .bucket
            .put_object_with_content_type(Self::object_path(key), &buf, &key.content_type())
            .await
            .map_err(backend)?;

        match response.status_code() {
            200..=299 => Ok(size),
            status => Err(unexpected_status("PUT", key, status)),
        }
    }

    async fn get_stream(&self, key: &BlobKey) -> Result<BoxReader, StorageError> {
        let response = self
            .bucket
            .get_object(Self::object_path(key))
            .await
            .map_err(backend)?;

        match response.status_code() {
            200..=299 => Ok(Box::new(std::io::Cursor::new(response.bytes().to_vec()))),
            404 => Err(StorageError::NotFound(key.object_name())),
            status => Err(unexpected_status("GET", key, status)),
        }
    }

    async fn exists(&self, key: &BlobKey) -> Result<bool, StorageError> {
        let (_, status) = self
            .bucket
            .head_object(Self::object_path(key))
            .await
            .map_err(backend)?;

        match status {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(unexpected_status("HEAD", key, status)),
        }
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool, StorageError> {
        if !self.exists(key).await? {
            return Ok(false);
        }

        let response = self
            .bucket
            .delete_object(Self::object_path(key))
            .await
            .map_err(backend)?;

        match response.status_code() {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(unexpected_status("DELETE", key, status)),
        }
    }
}
