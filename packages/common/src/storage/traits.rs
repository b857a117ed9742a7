use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::key::BlobKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Keyed blob storage for media payloads.
///
/// Implementations must allow concurrent `put`s for distinct keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Provision the bucket or directory if it does not exist yet. Idempotent.
    async fn ensure_bucket_exists(&self) -> Result<(), StorageError>;

    /// Store bytes under `key`, returning the number of bytes written.
    async fn put(&self, key: &BlobKey, data: &[u8]) -> Result<u64, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(key, reader).await
    }

    /// Store data from an async reader under `key`.
    async fn put_stream(&self, key: &BlobKey, reader: BoxReader) -> Result<u64, StorageError>;

    /// Retrieve all bytes of an object.
    ///
    /// Buffers the whole object in memory. Serving paths use
    /// [`get_stream`](Self::get_stream); this is for small objects and checks.
    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve an object as a streaming async reader.
    async fn get_stream(&self, key: &BlobKey) -> Result<BoxReader, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, key: &BlobKey) -> Result<bool, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &BlobKey) -> Result<bool, StorageError>;
}
