//! Error types for the registry system

use thiserror::Error;

/// Registry-specific errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no import is staged; upload a document first")]
    NothingStaged,

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("import failed: {0}")]
    ImportFailed(String),

    #[error("store operation failed: {0}")]
    Store(String),

    #[error("serialization/deserialization error: {0}")]
    Serialization(String),
}

impl From<storeport_core::CoreError> for RegistryError {
    fn from(err: storeport_core::CoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Registry result type
pub type RegistryResult<T> = Result<T, RegistryError>;
