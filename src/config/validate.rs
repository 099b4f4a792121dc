use anyhow::{Result, bail};

use super::{AppConfig, AuthMode, defaults::MAX_SIGNED_URL_EXPIRATION_SECS, running_in_lambda};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    validate_for_runtime(cfg, running_in_lambda())
}

/// `in_lambda` decides whether an API gateway authorizer can be assumed in
/// front of the process.
pub fn validate_for_runtime(cfg: &AppConfig, in_lambda: bool) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.storage.todos_table.trim().is_empty() {
        errors.push("storage.todos_table must not be empty".to_string());
    }

    if cfg.storage.attachment_bucket.trim().is_empty() {
        errors.push("storage.attachment_bucket must not be empty".to_string());
    }

    if cfg.storage.signed_url_expiration_secs == 0 {
        errors.push("storage.signed_url_expiration_secs must be > 0".to_string());
    }

    if cfg.storage.signed_url_expiration_secs > MAX_SIGNED_URL_EXPIRATION_SECS {
        errors.push(format!(
            "storage.signed_url_expiration_secs ({}) must be <= {}",
            cfg.storage.signed_url_expiration_secs, MAX_SIGNED_URL_EXPIRATION_SECS
        ));
    }

    if cfg
        .storage
        .endpoint_url
        .as_deref()
        .is_some_and(|endpoint| endpoint.trim().is_empty())
    {
        errors.push("storage.endpoint_url must not be empty when set".to_string());
    }

    if cfg.auth.mode == AuthMode::Hs256
        && cfg
            .auth
            .jwt_secret
            .as_deref()
            .is_none_or(|secret| secret.trim().is_empty())
    {
        errors.push("auth.jwt_secret is required when auth.mode is hs256".to_string());
    }

    if cfg.auth.mode == AuthMode::Upstream && !in_lambda && !cfg.auth.allow_unverified_tokens {
        errors.push(
            "auth.mode upstream skips signature checks and needs an API gateway authorizer; \
             use hs256 outside Lambda or set auth.allow_unverified_tokens"
                .to_string(),
        );
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate_for_runtime;
    use crate::config::{AppConfig, AuthMode};

    fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
        validate_for_runtime(cfg, true)
    }

    fn valid_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.storage.todos_table = "Todos-dev".to_string();
        cfg.storage.attachment_bucket = "todo-attachments-dev".to_string();
        cfg
    }

    #[test]
    fn accepts_minimal_storage_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn reports_every_missing_storage_field() {
        let err = validate(&AppConfig::default()).expect_err("empty storage should fail");
        let message = err.to_string();

        assert!(message.contains("storage.todos_table"), "{message}");
        assert!(message.contains("storage.attachment_bucket"), "{message}");
    }

    #[test]
    fn rejects_expiration_outside_presign_window() {
        let mut cfg = valid_config();
        cfg.storage.signed_url_expiration_secs = 0;
        assert!(validate(&cfg).is_err());

        cfg.storage.signed_url_expiration_secs = 8 * 24 * 60 * 60;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn hs256_mode_requires_secret() {
        let mut cfg = valid_config();
        cfg.auth.mode = AuthMode::Hs256;
        assert!(validate(&cfg).is_err());

        cfg.auth.jwt_secret = Some("local-dev-secret".to_string());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn upstream_mode_outside_lambda_is_rejected() {
        let cfg = valid_config();

        let err = validate_for_runtime(&cfg, false).expect_err("unverified tokens off lambda");
        assert!(err.to_string().contains("auth.mode upstream"), "{err}");
    }

    #[test]
    fn upstream_mode_outside_lambda_needs_explicit_opt_in() {
        let mut cfg = valid_config();
        cfg.auth.allow_unverified_tokens = true;
        assert!(validate_for_runtime(&cfg, false).is_ok());

        cfg.auth.allow_unverified_tokens = false;
        cfg.auth.mode = AuthMode::Hs256;
        cfg.auth.jwt_secret = Some("local-dev-secret".to_string());
        assert!(validate_for_runtime(&cfg, false).is_ok());
    }
}
