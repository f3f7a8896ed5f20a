//! Export orchestrator: runs confirmed handlers and accumulates one document

use crate::error::RegistryResult;
use crate::registry::HandlerRegistry;
use std::sync::Arc;
use storeport_core::{ConfigDocument, HandlerKind};
use tracing::{info, warn};

/// Accumulates the export document by invoking each confirmed handler in
/// caller-supplied order.
pub struct Exporter {
    registry: Arc<HandlerRegistry>,
}

impl Exporter {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Runs every confirmed handler and merges its sections into one
    /// document. A confirmed kind with no registered handler is logged and
    /// skipped. A handler error propagates immediately; the partial document
    /// is dropped with it.
    pub async fn export(&self, confirmed: &[HandlerKind]) -> RegistryResult<ConfigDocument> {
        let mut document = ConfigDocument::new();

        for kind in confirmed {
            let Some(handler) = self.registry.export_handler(kind) else {
                warn!(kind = %kind, "no export handler registered, skipping");
                continue;
            };

            info!(kind = %kind, "running export handler");
            let sections = handler.export().await?;
            document.merge(sections);
        }

        Ok(document)
    }
}
