//! Blob storage for equipment photos

pub mod local;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::{
    config::{StorageBackend, StorageConfig},
    error::{AppError, AppResult},
};

pub use local::LocalPhotoStore;
pub use memory::MemoryPhotoStore;
pub use s3::S3PhotoStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous object
    async fn upload(&self, key: &str, data: Bytes, content_type: Option<String>) -> AppResult<()>;

    /// Publicly fetchable URL of the object at `key`
    fn public_url(&self, key: &str) -> String;
}

/// Build the photo store selected by `storage.backend`
pub async fn from_config(config: &StorageConfig) -> AppResult<Arc<dyn PhotoStore>> {
    let store: Arc<dyn PhotoStore> = match config.backend {
        StorageBackend::Local => Arc::new(
            LocalPhotoStore::new(config.local_path.clone(), config.public_base_url.clone()).await?,
        ),
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                AppError::Internal("storage.s3 must be configured for the s3 backend".to_string())
            })?;
            Arc::new(S3PhotoStore::new(s3, config.public_base_url.clone()))
        }
        StorageBackend::Memory => Arc::new(MemoryPhotoStore::new(
            config
                .public_base_url
                .clone()
                .unwrap_or_else(|| "memory://photos".to_string()),
        )),
    };
    Ok(store)
}

pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
