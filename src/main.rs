use std::{net::SocketAddr, sync::Arc};

use serverless_todo::{
    auth::JwtIdentityProvider,
    config::{AppConfig, defaults::DEFAULT_RUST_LOG, running_in_lambda},
    db::{
        connection,
        providers::{DynamoTodoTable, S3UploadSigner},
    },
    logging::init_tracing,
    routes::app,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            init_tracing(DEFAULT_RUST_LOG);
            return Err(err);
        }
    };
    init_tracing(&cfg.logging.rust_log);

    let clients = connection::connect(&cfg.storage).await?;
    let table = Arc::new(DynamoTodoTable::new(
        clients.dynamodb,
        cfg.storage.todos_table.clone(),
    ));
    let signer = Arc::new(S3UploadSigner::new(
        clients.s3,
        cfg.storage.attachment_bucket.clone(),
    ));
    let identity = Arc::new(JwtIdentityProvider::from_config(&cfg.auth));

    let state = AppState::new(cfg, table, signer, identity);
    let app = app(Arc::clone(&state));

    if running_in_lambda() {
        tracing::info!(table = %state.config.storage.todos_table, "starting lambda runtime");
        return lambda_http::run(app).await.map_err(|err| anyhow::anyhow!(err));
    }

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.general.host, state.config.general.port
    )
    .parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
