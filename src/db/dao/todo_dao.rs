use std::{sync::Arc, time::Duration};

use tracing::info;

use super::DaoResult;
use crate::db::{
    entities::{TodoItem, TodoUpdate},
    providers::{TodoTable, UploadSigner},
};

/// Storage primitives for todo items plus the attachment upload link.
#[derive(Clone)]
pub struct TodoDao {
    table: Arc<dyn TodoTable>,
    signer: Arc<dyn UploadSigner>,
    bucket: String,
    url_expiration: Duration,
}

impl TodoDao {
    pub fn new(
        table: Arc<dyn TodoTable>,
        signer: Arc<dyn UploadSigner>,
        bucket: impl Into<String>,
        url_expiration: Duration,
    ) -> Self {
        Self {
            table,
            signer,
            bucket: bucket.into(),
            url_expiration,
        }
    }

    pub async fn create_item(&self, item: TodoItem) -> DaoResult<TodoItem> {
        info!(user_id = %item.user_id, todo_id = %item.todo_id, "create_item");
        self.table.put(&item).await?;
        Ok(item)
    }

    pub async fn list_items(&self, user_id: &str) -> DaoResult<Vec<TodoItem>> {
        info!(user_id, "list_items");
        self.table.query_by_user(user_id).await
    }

    pub async fn item_exists(&self, todo_id: &str, user_id: &str) -> DaoResult<bool> {
        info!(user_id, todo_id, "item_exists");
        Ok(self.table.get(user_id, todo_id).await?.is_some())
    }

    pub async fn update_item(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> DaoResult<()> {
        info!(user_id, todo_id, "update_item");
        self.table.update_fields(user_id, todo_id, update).await
    }

    pub async fn delete_item(&self, todo_id: &str, user_id: &str) -> DaoResult<()> {
        info!(user_id, todo_id, "delete_item");
        self.table.delete(user_id, todo_id).await
    }

    /// Signs a PUT for `attachment_id` and records the object's public url on
    /// the item straight away. The url is stored before any upload happens,
    /// so it may point at an object that never arrives.
    pub async fn mint_upload_url(
        &self,
        todo_id: &str,
        attachment_id: &str,
        user_id: &str,
    ) -> DaoResult<String> {
        info!(user_id, todo_id, attachment_id, "mint_upload_url");
        let signed = self
            .signer
            .presign_put(attachment_id, self.url_expiration)
            .await?;
        self.table
            .set_attachment_url(user_id, todo_id, &self.attachment_url(attachment_id))
            .await?;
        Ok(signed.url)
    }

    pub fn attachment_url(&self, attachment_id: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, attachment_id)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use crate::{
        db::entities::{TodoItem, TodoUpdate},
        test_helpers::{FixedUploadSigner, MemoryTodoTable},
    };

    use super::TodoDao;

    fn dao() -> (TodoDao, Arc<MemoryTodoTable>, Arc<FixedUploadSigner>) {
        let table = Arc::new(MemoryTodoTable::default());
        let signer = Arc::new(FixedUploadSigner::default());
        let dao = TodoDao::new(
            table.clone(),
            signer.clone(),
            "todo-attachments-dev",
            Duration::from_secs(300),
        );
        (dao, table, signer)
    }

    #[tokio::test]
    async fn lists_newest_sort_key_first_and_scoped_to_user() {
        let (dao, _, _) = dao();
        let mut first = TodoItem::new("alice", "a".to_string(), None);
        first.todo_id = "0001".to_string();
        let mut second = TodoItem::new("alice", "b".to_string(), None);
        second.todo_id = "0002".to_string();
        dao.create_item(first).await.unwrap();
        dao.create_item(second).await.unwrap();
        dao.create_item(TodoItem::new("bob", "c".to_string(), None))
            .await
            .unwrap();

        let items = dao.list_items("alice").await.unwrap();
        let ids: Vec<&str> = items.iter().map(|item| item.todo_id.as_str()).collect();

        assert_eq!(ids, vec!["0002", "0001"]);
    }

    #[tokio::test]
    async fn existence_is_scoped_by_both_keys() {
        let (dao, _, _) = dao();
        let item = dao
            .create_item(TodoItem::new("alice", "a".to_string(), None))
            .await
            .unwrap();

        assert!(dao.item_exists(&item.todo_id, "alice").await.unwrap());
        assert!(!dao.item_exists(&item.todo_id, "bob").await.unwrap());
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields_only() {
        let (dao, table, _) = dao();
        let item = dao
            .create_item(TodoItem::new("alice", "a".to_string(), Some("2023-12-31".to_string())))
            .await
            .unwrap();

        dao.update_item(
            "alice",
            &item.todo_id,
            &TodoUpdate {
                name: "b".to_string(),
                due_date: None,
                done: true,
            },
        )
        .await
        .unwrap();

        let stored = table.stored("alice", &item.todo_id).await.unwrap();
        assert_eq!(stored.name, "b");
        assert_eq!(stored.due_date, None);
        assert!(stored.done);
        assert_eq!(stored.created_at, item.created_at);
    }

    #[tokio::test]
    async fn mint_upload_url_persists_public_url_before_upload() {
        let (dao, table, signer) = dao();
        let item = dao
            .create_item(TodoItem::new("alice", "a".to_string(), None))
            .await
            .unwrap();

        let url = dao
            .mint_upload_url(&item.todo_id, "att-1", "alice")
            .await
            .unwrap();

        assert!(url.contains("att-1"));
        assert_eq!(signer.last_expiration().await, Some(Duration::from_secs(300)));
        let stored = table.stored("alice", &item.todo_id).await.unwrap();
        assert_eq!(
            stored.attachment_url,
            "https://todo-attachments-dev.s3.amazonaws.com/att-1"
        );
    }

    #[tokio::test]
    async fn delete_removes_only_the_keyed_item() {
        let (dao, _, _) = dao();
        let keep = dao
            .create_item(TodoItem::new("alice", "keep".to_string(), None))
            .await
            .unwrap();
        let drop = dao
            .create_item(TodoItem::new("alice", "drop".to_string(), None))
            .await
            .unwrap();

        dao.delete_item(&drop.todo_id, "alice").await.unwrap();

        assert!(dao.item_exists(&keep.todo_id, "alice").await.unwrap());
        assert!(!dao.item_exists(&drop.todo_id, "alice").await.unwrap());
    }
}
