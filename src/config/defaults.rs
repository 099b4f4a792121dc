pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_SIGNED_URL_EXPIRATION_SECS: i64 = 300;
pub const DEFAULT_CREATE_TABLE_IF_MISSING: bool = false;

/// Set by the Lambda runtime in every function environment.
pub const LAMBDA_RUNTIME_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

// S3 SigV4 presigned URLs cannot outlive seven days.
pub const MAX_SIGNED_URL_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Variable names used by the original serverless deployment. They are read
/// as defaults so an existing stack can run this binary unchanged.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("TODOS_TABLE", "storage.todos_table"),
    ("ATTACHMENT_S3_BUCKET", "storage.attachment_bucket"),
    ("SIGNED_URL_EXPIRATION", "storage.signed_url_expiration_secs"),
];
