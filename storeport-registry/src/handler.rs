//! Handler traits implemented by the feature modules

use crate::error::RegistryResult;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use storeport_core::{ConfigDocument, HandlerKind};

/// A registered unit of export logic for one configuration domain.
#[async_trait]
pub trait ExportHandler: Send + Sync {
    /// The section key this handler registers under
    fn kind(&self) -> HandlerKind;

    /// Human-readable notice shown when listing handlers for confirmation
    fn notice(&self) -> String;

    /// Collect this domain's configuration. Returns the section(s) — usually
    /// a single entry under the handler's own key — to merge into the
    /// export document.
    async fn export(&self) -> RegistryResult<Map<String, JsonValue>>;
}

/// A registered unit of import logic for one configuration domain.
#[async_trait]
pub trait ImportHandler: Send + Sync {
    /// The section key this handler registers under
    fn kind(&self) -> HandlerKind;

    /// Human-readable notice shown when listing handlers for confirmation
    fn notice(&self) -> String;

    /// Apply this domain's configuration. Receives the whole staged document
    /// and extracts its own section.
    async fn import(&self, document: &ConfigDocument) -> RegistryResult<()>;
}
