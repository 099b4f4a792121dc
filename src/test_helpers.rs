use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use axum::Router;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use tokio::sync::{Mutex, RwLock};

use crate::{
    auth::{Claims, JwtIdentityProvider},
    config::AppConfig,
    db::{
        dao::{DaoLayerError, DaoResult, TodoDao},
        entities::{TodoItem, TodoUpdate},
        providers::{SignedUpload, TodoTable, UploadSigner},
    },
    routes::app,
    services::todo_service::TodoService,
    state::AppState,
};

pub const TEST_BUCKET: &str = "todo-attachments-test";
pub const TEST_URL_EXPIRATION_SECS: u64 = 300;

/// In-process stand-in for the DynamoDB table, keyed by `(userId, todoId)`.
#[derive(Default)]
pub struct MemoryTodoTable {
    items: RwLock<BTreeMap<(String, String), TodoItem>>,
    failing: AtomicBool,
}

impl MemoryTodoTable {
    /// Makes every subsequent call fail the way an unreachable table would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn stored(&self, user_id: &str, todo_id: &str) -> Option<TodoItem> {
        self.items
            .read()
            .await
            .get(&(user_id.to_string(), todo_id.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check(&self) -> DaoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DaoLayerError::table(std::io::Error::other(
                "simulated table outage",
            )));
        }
        Ok(())
    }
}

fn key(user_id: &str, todo_id: &str) -> (String, String) {
    (user_id.to_string(), todo_id.to_string())
}

#[async_trait]
impl TodoTable for MemoryTodoTable {
    async fn put(&self, item: &TodoItem) -> DaoResult<()> {
        self.check()?;
        self.items
            .write()
            .await
            .insert(key(&item.user_id, &item.todo_id), item.clone());
        Ok(())
    }

    async fn query_by_user(&self, user_id: &str) -> DaoResult<Vec<TodoItem>> {
        self.check()?;
        let items = self.items.read().await;
        Ok(items
            .iter()
            .rev()
            .filter(|((owner, _), _)| owner == user_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn get(&self, user_id: &str, todo_id: &str) -> DaoResult<Option<TodoItem>> {
        self.check()?;
        Ok(self.stored(user_id, todo_id).await)
    }

    async fn update_fields(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> DaoResult<()> {
        self.check()?;
        let mut items = self.items.write().await;
        let item = items
            .entry(key(user_id, todo_id))
            .or_insert_with(|| key_only(user_id, todo_id));
        item.apply(update);
        Ok(())
    }

    async fn set_attachment_url(&self, user_id: &str, todo_id: &str, url: &str) -> DaoResult<()> {
        self.check()?;
        let mut items = self.items.write().await;
        let item = items
            .entry(key(user_id, todo_id))
            .or_insert_with(|| key_only(user_id, todo_id));
        item.attachment_url = url.to_string();
        Ok(())
    }

    async fn delete(&self, user_id: &str, todo_id: &str) -> DaoResult<()> {
        self.check()?;
        self.items.write().await.remove(&key(user_id, todo_id));
        Ok(())
    }
}

// Mirrors an UpdateItem against a missing key: only the key and the set
// attributes exist afterwards.
fn key_only(user_id: &str, todo_id: &str) -> TodoItem {
    TodoItem {
        user_id: user_id.to_string(),
        todo_id: todo_id.to_string(),
        name: String::new(),
        due_date: None,
        done: false,
        created_at: String::new(),
        attachment_url: String::new(),
    }
}

/// Signer that produces a recognisable url and records what it was asked for.
#[derive(Default)]
pub struct FixedUploadSigner {
    requests: Mutex<Vec<(String, Duration)>>,
}

impl FixedUploadSigner {
    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn last_expiration(&self) -> Option<Duration> {
        self.requests
            .lock()
            .await
            .last()
            .map(|(_, expires_in)| *expires_in)
    }
}

#[async_trait]
impl UploadSigner for FixedUploadSigner {
    async fn presign_put(&self, key: &str, expires_in: Duration) -> DaoResult<SignedUpload> {
        self.requests
            .lock()
            .await
            .push((key.to_string(), expires_in));
        Ok(SignedUpload {
            url: format!(
                "https://signed.example/{key}?X-Amz-Expires={}",
                expires_in.as_secs()
            ),
            expires_in,
        })
    }
}

#[derive(Clone)]
pub struct TestStorage {
    pub table: Arc<MemoryTodoTable>,
    pub signer: Arc<FixedUploadSigner>,
}

impl TestStorage {
    pub fn new() -> Self {
        Self {
            table: Arc::new(MemoryTodoTable::default()),
            signer: Arc::new(FixedUploadSigner::default()),
        }
    }
}

impl Default for TestStorage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.todos_table = "Todos-test".to_string();
    cfg.storage.attachment_bucket = TEST_BUCKET.to_string();
    cfg.storage.signed_url_expiration_secs = TEST_URL_EXPIRATION_SECS;
    cfg.auth.allow_unverified_tokens = true;
    cfg
}

pub fn memory_todo_service() -> (TodoService, TestStorage) {
    let storage = TestStorage::new();
    let dao = TodoDao::new(
        storage.table.clone(),
        storage.signer.clone(),
        TEST_BUCKET,
        Duration::from_secs(TEST_URL_EXPIRATION_SECS),
    );
    (TodoService::new(dao), storage)
}

pub fn test_state(cfg: AppConfig, storage: &TestStorage) -> Arc<AppState> {
    let identity = Arc::new(JwtIdentityProvider::from_config(&cfg.auth));
    AppState::new(cfg, storage.table.clone(), storage.signer.clone(), identity)
}

/// Full application router over in-memory storage.
pub fn test_router() -> (Router, TestStorage) {
    let storage = TestStorage::new();
    let state = test_state(test_config(), &storage);
    (app(state), storage)
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

/// HS256 token for `sub`, valid for an hour.
pub fn sign_token(secret: &[u8], sub: &str) -> String {
    let iat = now_unix();
    let claims = Claims {
        sub: sub.to_string(),
        iat,
        exp: iat + 3600,
    };
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());
    encode(&header, &claims, &EncodingKey::from_secret(secret)).expect("token should encode")
}

pub fn bearer(sub: &str) -> String {
    format!("Bearer {}", sign_token(b"upstream-authorizer-secret", sub))
}
