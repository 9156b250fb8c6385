//! S3-compatible photo store

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ObjectCannedAcl,
};
use bytes::Bytes;

use super::{join_url, PhotoStore};
use crate::{
    config::S3Config,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone)]
pub struct S3PhotoStore {
    bucket: String,
    client: aws_sdk_s3::Client,
    public_base_url: String,
}

impl S3PhotoStore {
    pub fn new(config: &S3Config, public_base_url: Option<String>) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone().unwrap_or_default(),
            config.secret_key.clone().unwrap_or_default(),
            None,
            None,
            "equipment-registry",
        );

        let builder = match &config.endpoint {
            Some(endpoint) => aws_sdk_s3::config::Builder::new().endpoint_url(endpoint),
            None => aws_sdk_s3::config::Builder::new(),
        };

        let client = aws_sdk_s3::Client::from_conf(
            builder
                .region(Region::new(config.region.clone()))
                .credentials_provider(credentials)
                .force_path_style(true)
                .build(),
        );

        Self {
            bucket: config.bucket.clone(),
            client,
            public_base_url: public_base_url.unwrap_or_else(|| default_public_base_url(config)),
        }
    }
}

/// Path-style object URL for the bucket
fn default_public_base_url(config: &S3Config) -> String {
    match &config.endpoint {
        Some(endpoint) => join_url(endpoint, &config.bucket),
        None => format!("https://s3.{}.amazonaws.com/{}", config.region, config.bucket),
    }
}

#[async_trait]
impl PhotoStore for S3PhotoStore {
    #[tracing::instrument(name = "S3PhotoStore::upload", skip(self, data, content_type), fields(bucket = %self.bucket, size = data.len()), err)]
    async fn upload(&self, key: &str, data: Bytes, content_type: Option<String>) -> AppResult<()> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key.trim_start_matches('/'))
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(data));

        if let Some(content_type) = content_type {
            req = req.content_type(content_type);
        }

        req.send()
            .await
            .map_err(|e| AppError::PhotoUpload(format!("{:?}", e)))?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> S3Config {
        S3Config {
            bucket: "equipment".to_string(),
            region: "ap-northeast-1".to_string(),
            endpoint: endpoint.map(str::to_string),
            access_key: None,
            secret_key: None,
        }
    }

    #[test]
    fn test_public_url_defaults() {
        assert_eq!(
            default_public_base_url(&config(Some("http://minio:9000/"))),
            "http://minio:9000/equipment"
        );
        assert_eq!(
            default_public_base_url(&config(None)),
            "https://s3.ap-northeast-1.amazonaws.com/equipment"
        );
    }

    #[tokio::test]
    async fn test_public_url_prefers_configured_base() {
        let store = S3PhotoStore::new(&config(None), Some("https://cdn.example.com".into()));
        assert_eq!(
            store.public_url("equipmentPhotos/6"),
            "https://cdn.example.com/equipmentPhotos/6"
        );
    }
}
