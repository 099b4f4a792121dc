mod dynamodb;
mod s3;

use std::time::Duration;

use async_trait::async_trait;

pub use dynamodb::DynamoTodoTable;
pub use s3::S3UploadSigner;

use crate::db::{
    dao::DaoResult,
    entities::{TodoItem, TodoUpdate},
};

/// Keyed table holding todo items, partitioned by user and sorted by todo id.
#[async_trait]
pub trait TodoTable: Send + Sync {
    async fn put(&self, item: &TodoItem) -> DaoResult<()>;

    /// Every item in the user's partition, sort key descending.
    async fn query_by_user(&self, user_id: &str) -> DaoResult<Vec<TodoItem>>;

    async fn get(&self, user_id: &str, todo_id: &str) -> DaoResult<Option<TodoItem>>;

    async fn update_fields(&self, user_id: &str, todo_id: &str, update: &TodoUpdate)
    -> DaoResult<()>;

    /// Upserts: a missing key gets a record carrying only the url.
    async fn set_attachment_url(&self, user_id: &str, todo_id: &str, url: &str) -> DaoResult<()>;

    async fn delete(&self, user_id: &str, todo_id: &str) -> DaoResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUpload {
    pub url: String,
    pub expires_in: Duration,
}

/// Object store capability limited to minting write URLs for single keys.
#[async_trait]
pub trait UploadSigner: Send + Sync {
    async fn presign_put(&self, key: &str, expires_in: Duration) -> DaoResult<SignedUpload>;
}
