//! Import orchestrator: staging, confirmation round-trip, handler dispatch

use crate::error::{RegistryError, RegistryResult};
use crate::registry::HandlerRegistry;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use storeport_core::{
    sanitization::sanitize_document, store::TransientStore, ConfigDocument, HandlerKind,
    StagedImport,
};
use tracing::{info, warn};

/// What a completed import did, per top-level key of the staged document.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub applied: Vec<HandlerKind>,
    pub skipped_unconfirmed: Vec<String>,
    pub skipped_unregistered: Vec<String>,
}

/// Stages uploaded documents and dispatches confirmed sections to their
/// import handlers.
pub struct Importer {
    registry: Arc<HandlerRegistry>,
    transients: Arc<dyn TransientStore>,
}

impl Importer {
    pub fn new(registry: Arc<HandlerRegistry>, transients: Arc<dyn TransientStore>) -> Self {
        Self { registry, transients }
    }

    /// Decodes and sanitizes an uploaded payload, then parks it in the
    /// staging slot for the confirmation round-trip. Malformed JSON and
    /// non-object documents are typed errors; no handler runs.
    pub async fn stage(&self, payload: &str, source_name: &str) -> RegistryResult<StagedImport> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| RegistryError::InvalidDocument(format!("not valid JSON: {}", e)))?;
        let document = ConfigDocument::from_value(value)
            .map_err(|e| RegistryError::InvalidDocument(e.to_string()))?;
        let document = sanitize_document(&document);

        let staged = StagedImport {
            id: uuid::Uuid::new_v4().to_string(),
            source_name: source_name.to_string(),
            document,
            staged_at: Utc::now(),
        };
        self.transients.put_staged(&staged).await?;

        info!(
            id = %staged.id,
            source = %staged.source_name,
            sections = staged.document.len(),
            "staged import document"
        );
        Ok(staged)
    }

    /// Reloads the staged document and dispatches each of its top-level keys
    /// that is both confirmed and registered. Unconfirmed or unregistered
    /// keys are skipped and logged, never erroring the operation. A handler
    /// error aborts the remaining handlers and keeps the staged document so
    /// the import can be retried; full success clears the slot.
    pub async fn complete(&self, confirmed: &[HandlerKind]) -> RegistryResult<ImportSummary> {
        let staged = self
            .transients
            .get_staged()
            .await?
            .ok_or(RegistryError::NothingStaged)?;

        let confirmed_set: HashSet<&str> = confirmed.iter().map(|k| k.as_str()).collect();
        let mut summary = ImportSummary::default();

        for key in staged.document.keys() {
            if !confirmed_set.contains(key) {
                warn!(kind = key, "section not confirmed, skipping");
                summary.skipped_unconfirmed.push(key.to_string());
                continue;
            }

            let kind = HandlerKind::new(key);
            let Some(handler) = self.registry.import_handler(&kind) else {
                warn!(kind = key, "no import handler registered, skipping");
                summary.skipped_unregistered.push(key.to_string());
                continue;
            };

            info!(kind = key, "running import handler");
            handler.import(&staged.document).await?;
            summary.applied.push(kind);
        }

        self.transients.clear_staged().await?;
        Ok(summary)
    }

    /// The currently staged document, if any
    pub async fn staged(&self) -> RegistryResult<Option<StagedImport>> {
        Ok(self.transients.get_staged().await?)
    }
}
