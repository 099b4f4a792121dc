use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, cors_layer, json_error_middleware},
    state::AppState,
};

use super::{public, todos};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(todos::router(state))
}

/// The router wrapped in the response post-processing every deployment uses:
/// JSON error bodies, panic capture, CORS headers and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
