//! In-process photo store

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{join_url, PhotoStore};
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub data: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug)]
pub struct MemoryPhotoStore {
    public_base_url: String,
    photos: RwLock<HashMap<String, StoredPhoto>>,
}

impl MemoryPhotoStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            photos: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredPhoto> {
        self.photos.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.photos.read().await.len()
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn upload(&self, key: &str, data: Bytes, content_type: Option<String>) -> AppResult<()> {
        self.photos
            .write()
            .await
            .insert(key.to_string(), StoredPhoto { data, content_type });
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}
