//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Registry error: {0}")]
    Registry(#[from] storeport_registry::RegistryError),

    #[error("Store error: {0}")]
    Store(#[from] storeport_core::CoreError),

    #[error("Archive error: {0}")]
    Archive(#[from] storeport_archive::ArchiveError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] storeport_handlers::catalog::CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("General error: {0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(err.to_string())
    }
}

impl From<storeport_store::StoreError> for CliError {
    fn from(err: storeport_store::StoreError) -> Self {
        Self::Store(err.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
