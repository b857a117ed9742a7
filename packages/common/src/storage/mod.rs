mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::sync::Arc;

pub use error::StorageError;
pub use key::BlobKey;
pub use traits::{BlobStore, BoxReader};

use crate::config::{StorageBackend, StorageConfig};

/// Build the blob store selected by `config`.
///
/// Does not provision the bucket; call [`BlobStore::ensure_bucket_exists`] once
/// at startup.
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => Ok(Arc::new(
            filesystem::FilesystemBlobStore::new(
                config.filesystem.path.clone(),
                config.max_blob_size,
            )
            .await?,
        )),
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => Ok(Arc::new(s3::S3BlobStore::new(
            &config.s3,
            config.max_blob_size,
        )?)),
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "S3 backend requires the `object-storage` feature".into(),
        )),
    }
}
