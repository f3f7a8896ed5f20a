use storeport_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            #[cfg(feature = "sqlite")]
            StoreError::Database(e) => CoreError::Db(e.to_string()),
            StoreError::Serialization(e) => CoreError::Serde(e.to_string()),
            StoreError::InvalidData(msg) => CoreError::Invalid(msg),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
