use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, types::AttributeValue};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};
use tracing::debug;

use super::TodoTable;
use crate::db::{
    dao::{DaoLayerError, DaoResult},
    entities::{
        TodoItem, TodoUpdate,
        todo_item::{PARTITION_KEY, SORT_KEY},
    },
};

#[derive(Debug, Clone)]
pub struct DynamoTodoTable {
    client: Client,
    table_name: String,
}

impl DynamoTodoTable {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn key(user_id: &str, todo_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                PARTITION_KEY.to_string(),
                AttributeValue::S(user_id.to_string()),
            ),
            (SORT_KEY.to_string(), AttributeValue::S(todo_id.to_string())),
        ])
    }
}

fn table_error<E>(err: E) -> DaoLayerError
where
    E: std::error::Error,
{
    DaoLayerError::table(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl TodoTable for DynamoTodoTable {
    async fn put(&self, item: &TodoItem) -> DaoResult<()> {
        let attributes: HashMap<String, AttributeValue> = to_item(item)?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(table_error)?;
        Ok(())
    }

    async fn query_by_user(&self, user_id: &str) -> DaoResult<Vec<TodoItem>> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let response = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", PARTITION_KEY)
                .expression_attribute_values(":pk", AttributeValue::S(user_id.to_string()))
                .scan_index_forward(false)
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .map_err(table_error)?;

            if let Some(page) = response.items {
                debug!(count = page.len(), "query page");
                let mut page: Vec<TodoItem> = from_items(page)?;
                items.append(&mut page);
            }

            last_evaluated_key = response.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
        }

        Ok(items)
    }

    async fn get(&self, user_id: &str, todo_id: &str) -> DaoResult<Option<TodoItem>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, todo_id)))
            .send()
            .await
            .map_err(table_error)?;

        match response.item {
            Some(attributes) => Ok(Some(from_item(attributes)?)),
            None => Ok(None),
        }
    }

    async fn update_fields(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> DaoResult<()> {
        let request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, todo_id)))
            .expression_attribute_names("#name", "name")
            .expression_attribute_names("#dueDate", "dueDate")
            .expression_attribute_names("#done", "done")
            .expression_attribute_values(":name", AttributeValue::S(update.name.clone()))
            .expression_attribute_values(":done", AttributeValue::Bool(update.done));

        // A cleared due date is removed rather than stored as NULL.
        let request = match &update.due_date {
            Some(due_date) => request
                .update_expression("SET #name = :name, #dueDate = :dueDate, #done = :done")
                .expression_attribute_values(":dueDate", AttributeValue::S(due_date.clone())),
            None => request.update_expression("SET #name = :name, #done = :done REMOVE #dueDate"),
        };

        request.send().await.map_err(table_error)?;
        Ok(())
    }

    async fn set_attachment_url(&self, user_id: &str, todo_id: &str, url: &str) -> DaoResult<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, todo_id)))
            .update_expression("SET #attachmentUrl = :attachmentUrl")
            .expression_attribute_names("#attachmentUrl", "attachmentUrl")
            .expression_attribute_values(":attachmentUrl", AttributeValue::S(url.to_string()))
            .send()
            .await
            .map_err(table_error)?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, todo_id: &str) -> DaoResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, todo_id)))
            .send()
            .await
            .map_err(table_error)?;
        Ok(())
    }
}
