use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};
use serde::Serialize;

use crate::{
    auth::CallerId,
    db::entities::TodoItem,
    error::AppError,
    response::ApiResult,
    services::{ServiceContext, todo_service::TodoService},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CreatedTodoResponse {
    pub item: TodoItem,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub items: Vec<TodoItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route("/todos/{todo_id}", patch(update_todo).delete(delete_todo))
        .route("/todos/{todo_id}/attachment", post(generate_upload_url))
        .with_state(state)
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    caller: CallerId,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedTodoResponse>)> {
    let item = todo_service_from_state(&state)
        .create(&caller, &body)
        .await
        .map_err(|err| err.or_generic("Error creating todo"))?;
    Ok((StatusCode::CREATED, Json(CreatedTodoResponse { item })))
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    caller: CallerId,
) -> ApiResult<Json<TodoListResponse>> {
    let items = todo_service_from_state(&state)
        .list(&caller)
        .await
        .map_err(|err| err.or_generic("Error listing todos"))?;
    Ok(Json(TodoListResponse { items }))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    caller: CallerId,
    Path(todo_id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    if body.iter().all(u8::is_ascii_whitespace) || todo_id.trim().is_empty() {
        return Err(AppError::bad_request("Error updating todo"));
    }

    todo_service_from_state(&state)
        .update(&caller, &todo_id, &body)
        .await
        .map_err(|err| err.or_generic("Error updating todo"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    caller: CallerId,
    Path(todo_id): Path<String>,
) -> ApiResult<StatusCode> {
    todo_service_from_state(&state)
        .delete(&caller, &todo_id)
        .await
        .map_err(|err| err.or_generic("Error deleting todo"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_upload_url(
    State(state): State<Arc<AppState>>,
    caller: CallerId,
    Path(todo_id): Path<String>,
) -> ApiResult<Json<UploadUrlResponse>> {
    let upload_url = todo_service_from_state(&state)
        .generate_upload_url(&caller, &todo_id)
        .await
        .map_err(|err| err.or_generic("Error uploading attachment"))?;
    Ok(Json(UploadUrlResponse { upload_url }))
}

fn todo_service_from_state(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}
