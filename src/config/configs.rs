use std::time::Duration;

use anyhow::Result;
use config::builder::{ConfigBuilder, DefaultState};
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn defaults(
        mut builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>> {
        for (var, key) in defaults::LEGACY_ENV_KEYS {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(*key, value)?;
            }
        }
        Ok(builder)
    }

    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub todos_table: String,
    pub attachment_bucket: String,
    pub signed_url_expiration_secs: u64,
    /// Points both SDK clients at a local DynamoDB / S3-compatible endpoint.
    pub endpoint_url: Option<String>,
    pub create_table_if_missing: bool,
}

impl StorageConfig {
    pub fn signed_url_expiration(&self) -> Duration {
        Duration::from_secs(self.signed_url_expiration_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            todos_table: String::new(),
            attachment_bucket: String::new(),
            signed_url_expiration_secs: defaults::DEFAULT_SIGNED_URL_EXPIRATION_SECS as u64,
            endpoint_url: None,
            create_table_if_missing: defaults::DEFAULT_CREATE_TABLE_IF_MISSING,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// The API gateway authorizer already verified the token signature.
    #[default]
    Upstream,
    Hs256,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub jwt_secret: Option<String>,
    /// Accepts `upstream` mode outside Lambda, for a process that sits behind
    /// some other verifying proxy.
    pub allow_unverified_tokens: bool,
}
