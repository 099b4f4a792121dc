pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, AuthConfig, AuthMode, GeneralConfig, LoggingConfig, StorageConfig};
pub use envconfig::EnvConfig;

pub fn running_in_lambda() -> bool {
    std::env::var_os(defaults::LAMBDA_RUNTIME_ENV).is_some()
}
