use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use super::{CallerId, jwt::JwtVerifier};
use crate::{
    config::{AuthConfig, AuthMode},
    error::AppError,
    state::AppState,
};

/// Resolves who is calling from an already-authenticated request.
pub trait CallerIdentityProvider: Send + Sync {
    fn caller_id(&self, headers: &HeaderMap) -> Result<CallerId, AppError>;
}

/// Takes the caller id from the `sub` claim of the bearer token.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    verifier: JwtVerifier,
}

impl JwtIdentityProvider {
    pub fn new(verifier: JwtVerifier) -> Self {
        Self { verifier }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        let verifier = match cfg.mode {
            AuthMode::Upstream => JwtVerifier::upstream(),
            AuthMode::Hs256 => {
                JwtVerifier::hs256(cfg.jwt_secret.as_deref().unwrap_or_default().as_bytes())
            }
        };
        Self::new(verifier)
    }
}

impl CallerIdentityProvider for JwtIdentityProvider {
    fn caller_id(&self, headers: &HeaderMap) -> Result<CallerId, AppError> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = auth
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;

        let claims = self.verifier.decode(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::unauthorized("Token has no subject"));
        }
        Ok(CallerId::new(claims.sub))
    }
}

impl FromRequestParts<Arc<AppState>> for CallerId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(caller) = parts.extensions.get::<CallerId>().cloned() {
            return Ok(caller);
        }

        let caller = state.identity.caller_id(&parts.headers)?;
        parts.extensions.insert(caller.clone());
        Ok(caller)
    }
}
