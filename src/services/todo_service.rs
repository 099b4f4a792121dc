use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::CallerId,
    db::{
        dao::TodoDao,
        entities::{TodoItem, TodoUpdate},
    },
    error::AppError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

pub type UpdateTodoRequest = TodoUpdate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteAck {
    pub status: &'static str,
}

impl DeleteAck {
    fn deleted() -> Self {
        Self {
            status: "Deleted successfully",
        }
    }
}

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn create(&self, caller: &CallerId, body: &[u8]) -> Result<TodoItem, AppError> {
        let request: CreateTodoRequest = parse_body(body)?;
        let item = TodoItem::new(caller.as_str(), request.name, request.due_date);
        info!(user_id = %caller, todo_id = %item.todo_id, "create todo");
        Ok(self.todo_dao.create_item(item).await?)
    }

    pub async fn list(&self, caller: &CallerId) -> Result<Vec<TodoItem>, AppError> {
        info!(user_id = %caller, "list todos");
        Ok(self.todo_dao.list_items(caller.as_str()).await?)
    }

    pub async fn delete(&self, caller: &CallerId, todo_id: &str) -> Result<DeleteAck, AppError> {
        self.require_item(caller, todo_id).await?;
        info!(user_id = %caller, todo_id, "delete todo");
        self.todo_dao.delete_item(todo_id, caller.as_str()).await?;
        Ok(DeleteAck::deleted())
    }

    /// Overwrites `name`, `dueDate` and `done`, returning the payload as
    /// submitted.
    pub async fn update(
        &self,
        caller: &CallerId,
        todo_id: &str,
        body: &[u8],
    ) -> Result<UpdateTodoRequest, AppError> {
        self.require_item(caller, todo_id).await?;
        let update: UpdateTodoRequest = parse_body(body)?;
        self.todo_dao
            .update_item(caller.as_str(), todo_id, &update)
            .await?;
        info!(user_id = %caller, todo_id, done = update.done, "update todo");
        Ok(update)
    }

    /// Only the presence of `todo_id` is checked, not that the caller owns
    /// such an item.
    pub async fn generate_upload_url(
        &self,
        caller: &CallerId,
        todo_id: &str,
    ) -> Result<String, AppError> {
        if todo_id.trim().is_empty() {
            return Err(not_found(todo_id));
        }

        let attachment_id = Uuid::new_v4().to_string();
        let upload_url = self
            .todo_dao
            .mint_upload_url(todo_id, &attachment_id, caller.as_str())
            .await?;
        info!(user_id = %caller, todo_id, attachment_id = %attachment_id, "generate upload url");
        Ok(upload_url)
    }

    async fn require_item(&self, caller: &CallerId, todo_id: &str) -> Result<(), AppError> {
        if !self.todo_dao.item_exists(todo_id, caller.as_str()).await? {
            return Err(not_found(todo_id));
        }
        Ok(())
    }
}

fn not_found(todo_id: &str) -> AppError {
    AppError::not_found(format!("Todo item not found with id {todo_id}"))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|err| {
        error!(error = %err, "malformed request body");
        AppError::internal(format!("Malformed request body: {err}"))
    })
}
