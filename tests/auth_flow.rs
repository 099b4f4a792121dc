use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use serverless_todo::{
    auth::Claims,
    config::AuthMode,
    routes::app,
    test_helpers::{TestStorage, now_unix, sign_token, test_config, test_router, test_state},
};

fn hs256_app(secret: &str) -> axum::Router {
    let mut cfg = test_config();
    cfg.auth.mode = AuthMode::Hs256;
    cfg.auth.jwt_secret = Some(secret.to_string());
    app(test_state(cfg, &TestStorage::new()))
}

async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(request).await.unwrap();
    let status = res.status();
    let body = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

fn list_with(auth: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri("/todos");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = test_router();

    let (status, json) = call(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn todos_require_bearer_token() {
    let (app, _) = test_router();

    let (status, json) = call(app, list_with(None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Missing/invalid Authorization header");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (app, _) = test_router();

    let (status, _) = call(app, list_with(Some("Bearer not.a.jwt".into()))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (app, _) = test_router();
    let now = now_unix();
    let claims = Claims {
        sub: "alice".into(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"whatever"),
    )
    .unwrap();

    let (status, _) = call(app, list_with(Some(format!("Bearer {token}")))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn hs256_mode_verifies_signature() {
    let app = hs256_app("right-secret");

    let forged = sign_token(b"wrong-secret", "alice");
    let (status, _) = call(app.clone(), list_with(Some(format!("Bearer {forged}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = sign_token(b"right-secret", "alice");
    let (status, json) = call(
        app,
        Request::builder()
            .method("POST")
            .uri("/todos")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "signed"}).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["item"]["userId"], "alice");
}
