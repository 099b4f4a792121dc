use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PARTITION_KEY: &str = "userId";
pub const SORT_KEY: &str = "todoId";

/// A single task owned by one user, keyed by `(userId, todoId)`.
///
/// Everything except the key is defaulted on read: an attachment link minted
/// for an id that was never created leaves a key-only record behind, and
/// listing must still decode it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub user_id: String,
    pub todo_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub attachment_url: String,
}

impl TodoItem {
    pub fn new(user_id: &str, name: String, due_date: Option<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            todo_id: Uuid::new_v4().to_string(),
            name,
            due_date,
            done: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            attachment_url: String::new(),
        }
    }

    pub fn apply(&mut self, update: &TodoUpdate) {
        self.name = update.name.clone();
        self.due_date = update.due_date.clone();
        self.done = update.done;
    }
}

/// The fields an update may overwrite. Everything else on [`TodoItem`] is
/// write-once or owned by the attachment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::{TodoItem, TodoUpdate};

    #[test]
    fn new_item_starts_open_without_attachment() {
        let item = TodoItem::new("auth0|alice", "Buy milk".to_string(), None);

        assert_eq!(item.user_id, "auth0|alice");
        assert!(!item.done);
        assert!(item.attachment_url.is_empty());
        assert!(uuid::Uuid::parse_str(&item.todo_id).is_ok());
        assert!(item.created_at.ends_with('Z'));
    }

    #[test]
    fn created_at_never_precedes_construction() {
        for _ in 0..500 {
            let before = chrono::Utc::now();
            let item = TodoItem::new("u", "n".to_string(), None);
            let created_at: chrono::DateTime<chrono::Utc> = item.created_at.parse().unwrap();
            assert!(created_at >= before, "{} < {before}", item.created_at);
        }
    }

    #[test]
    fn apply_leaves_identity_and_attachment_alone() {
        let mut item = TodoItem::new("auth0|alice", "Buy milk".to_string(), None);
        item.attachment_url = "https://bucket.s3.amazonaws.com/a".to_string();
        let before = item.clone();

        item.apply(&TodoUpdate {
            name: "Buy oat milk".to_string(),
            due_date: Some("2024-01-01".to_string()),
            done: true,
        });

        assert_eq!(item.name, "Buy oat milk");
        assert_eq!(item.due_date.as_deref(), Some("2024-01-01"));
        assert!(item.done);
        assert_eq!(item.user_id, before.user_id);
        assert_eq!(item.todo_id, before.todo_id);
        assert_eq!(item.created_at, before.created_at);
        assert_eq!(item.attachment_url, before.attachment_url);
    }

    #[test]
    fn decodes_key_only_record() {
        let item: TodoItem = serde_json::from_value(serde_json::json!({
            "userId": "auth0|alice",
            "todoId": "missing",
            "attachmentUrl": "https://bucket.s3.amazonaws.com/a"
        }))
        .expect("key-only record should decode");

        assert!(item.name.is_empty());
        assert!(!item.done);
    }

    #[test]
    fn serializes_camel_case_wire_names() {
        let item = TodoItem::new("u", "n".to_string(), Some("2024-01-01".to_string()));
        let json = serde_json::to_value(&item).unwrap();

        for key in ["userId", "todoId", "name", "dueDate", "done", "createdAt", "attachmentUrl"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
