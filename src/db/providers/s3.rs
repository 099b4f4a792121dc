use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{Client, error::DisplayErrorContext, presigning::PresigningConfig};

use super::{SignedUpload, UploadSigner};
use crate::db::dao::{DaoLayerError, DaoResult};

#[derive(Debug, Clone)]
pub struct S3UploadSigner {
    client: Client,
    bucket: String,
}

impl S3UploadSigner {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl UploadSigner for S3UploadSigner {
    async fn presign_put(&self, key: &str, expires_in: Duration) -> DaoResult<SignedUpload> {
        let config = PresigningConfig::expires_in(expires_in).map_err(DaoLayerError::presign)?;
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|err| DaoLayerError::presign(DisplayErrorContext(err).to_string()))?;

        Ok(SignedUpload {
            url: request.uri().to_string(),
            expires_in,
        })
    }
}
