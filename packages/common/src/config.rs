use std::path::PathBuf;

use serde::Deserialize;

/// Which blob storage backend to use for media payloads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local directory. Default.
    #[default]
    Filesystem,
    /// S3-compatible object storage (AWS, MinIO, ...).
    S3,
}

/// App-level blob storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Maximum size of a single stored object in bytes. Default: 32 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
    #[serde(default)]
    pub s3: S3StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    /// Root directory for stored objects. Default: "./data/blobs".
    #[serde(default = "default_filesystem_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3StorageConfig {
    /// Bucket name. Default: "quill-media".
    #[serde(default = "default_s3_bucket")]
    pub bucket: String,
    /// Region name. Default: "us-east-1".
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services such as MinIO.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Use path-style addressing (`endpoint/bucket/key`). Default: true.
    #[serde(default = "default_s3_path_style")]
    pub path_style: bool,
}

fn default_max_blob_size() -> u64 {
    32 * 1024 * 1024
}
fn default_filesystem_path() -> PathBuf {
    PathBuf::from("./data/blobs")
}
fn default_s3_bucket() -> String {
    "quill-media".into()
}
fn default_s3_region() -> String {
    "us-east-1".into()
}
fn default_s3_path_style() -> bool {
    true
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            path: default_filesystem_path(),
        }
    }
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_s3_bucket(),
            region: default_s3_region(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            path_style: default_s3_path_style(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_blob_size: default_max_blob_size(),
            filesystem: FilesystemStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}
