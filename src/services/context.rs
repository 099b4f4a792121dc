use crate::{db::dao::DaoContext, services::todo_service::TodoService, state::AppState};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            daos: DaoContext::new(state),
        }
    }

    pub fn todo(&self) -> TodoService {
        TodoService::new(self.daos.todo())
    }
}
