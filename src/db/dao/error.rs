use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("table request failed: {0}")]
    Table(#[source] BoxError),
    #[error("failed to presign upload: {0}")]
    Presign(#[source] BoxError),
    #[error("malformed todo record: {0}")]
    Record(#[from] serde_dynamo::Error),
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    pub fn table(err: impl Into<BoxError>) -> Self {
        Self::Table(err.into())
    }

    pub fn presign(err: impl Into<BoxError>) -> Self {
        Self::Presign(err.into())
    }
}
