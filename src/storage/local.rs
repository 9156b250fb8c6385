//! Photo store writing to a local directory served under `/photos`

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

use super::{join_url, PhotoStore};
use crate::error::{AppError, AppResult};

pub const DEFAULT_PUBLIC_PATH: &str = "/photos";

#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalPhotoStore {
    #[tracing::instrument(name = "LocalPhotoStore::new", skip(public_base_url), err)]
    pub async fn new(root: PathBuf, public_base_url: Option<String>) -> AppResult<Self> {
        if !root.exists() {
            tracing::debug!("creating photo directory");
            tokio::fs::create_dir_all(&root)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create {}: {}", root.display(), e)))?;
        }

        Ok(Self {
            root,
            public_base_url: public_base_url.unwrap_or_else(|| DEFAULT_PUBLIC_PATH.to_string()),
        })
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(AppError::PhotoUpload(format!("Invalid photo key: {}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    #[tracing::instrument(name = "LocalPhotoStore::upload", skip(self, data, content_type), fields(size = data.len(), content_type = ?content_type), err)]
    async fn upload(&self, key: &str, data: Bytes, content_type: Option<String>) -> AppResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::PhotoUpload(e.to_string()))?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::PhotoUpload(e.to_string()))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}
