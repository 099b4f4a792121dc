use std::sync::Arc;

use crate::{
    auth::CallerIdentityProvider,
    config::AppConfig,
    db::providers::{TodoTable, UploadSigner},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub table: Arc<dyn TodoTable>,
    pub signer: Arc<dyn UploadSigner>,
    pub identity: Arc<dyn CallerIdentityProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        table: Arc<dyn TodoTable>,
        signer: Arc<dyn UploadSigner>,
        identity: Arc<dyn CallerIdentityProvider>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            table,
            signer,
            identity,
        })
    }
}
