use std::sync::Arc;

use super::TodoDao;
use crate::state::AppState;

#[derive(Clone)]
pub struct DaoContext {
    todo: TodoDao,
}

impl DaoContext {
    pub fn new(state: &AppState) -> Self {
        let storage = &state.config.storage;
        Self {
            todo: TodoDao::new(
                Arc::clone(&state.table),
                Arc::clone(&state.signer),
                storage.attachment_bucket.clone(),
                storage.signed_url_expiration(),
            ),
        }
    }

    pub fn todo(&self) -> TodoDao {
        self.todo.clone()
    }
}
