use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Allow-all CORS for the browser client. Every response, errors included,
/// carries `Access-Control-Allow-Origin: *`.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
