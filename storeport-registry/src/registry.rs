//! Main registry implementation mapping handler kinds to handler instances

use crate::handler::{ExportHandler, ImportHandler};
use std::collections::HashMap;
use std::sync::Arc;
use storeport_core::{
    store::{
        GatewayCatalog, OptionsStore, PostStore, SettingsCatalog, ShippingStore, TableRateStore,
        TransientStore,
    },
    HandlerKind,
};

/// The backing stores and platform catalogs of the site being exported from
/// or imported into. Feature modules clone the handles they need at
/// registration time.
#[derive(Clone)]
pub struct SiteStores {
    pub options: Arc<dyn OptionsStore>,
    pub shipping: Arc<dyn ShippingStore>,
    pub table_rates: Arc<dyn TableRateStore>,
    pub posts: Arc<dyn PostStore>,
    pub transients: Arc<dyn TransientStore>,
    pub gateways: Arc<dyn GatewayCatalog>,
    pub settings: Arc<dyn SettingsCatalog>,
}

/// A function that contributes handlers to the registry. Feature modules
/// expose one of these; they all run once at startup.
pub type HandlerRegistrar = fn(&mut HandlerRegistry, &SiteStores);

/// Two parallel maps from handler kind to handler instance, one per
/// direction. A later registration for the same kind silently replaces the
/// earlier one.
#[derive(Default)]
pub struct HandlerRegistry {
    export_handlers: HashMap<HandlerKind, Arc<dyn ExportHandler>>,
    import_handlers: HashMap<HandlerKind, Arc<dyn ImportHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an export handler under its own kind; last registration wins
    pub fn register_export_handler(&mut self, handler: Arc<dyn ExportHandler>) {
        let kind = handler.kind();
        self.export_handlers.insert(kind, handler);
    }

    /// Register an import handler under its own kind; last registration wins
    pub fn register_import_handler(&mut self, handler: Arc<dyn ImportHandler>) {
        let kind = handler.kind();
        self.import_handlers.insert(kind, handler);
    }

    pub fn export_handler(&self, kind: &HandlerKind) -> Option<Arc<dyn ExportHandler>> {
        self.export_handlers.get(kind).cloned()
    }

    pub fn import_handler(&self, kind: &HandlerKind) -> Option<Arc<dyn ImportHandler>> {
        self.import_handlers.get(kind).cloned()
    }

    /// Registered export kinds with their notices, sorted for listing
    pub fn export_kinds(&self) -> Vec<(HandlerKind, String)> {
        let mut kinds: Vec<(HandlerKind, String)> = self
            .export_handlers
            .values()
            .map(|h| (h.kind(), h.notice()))
            .collect();
        kinds.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        kinds
    }

    /// Registered import kinds with their notices, sorted for listing
    pub fn import_kinds(&self) -> Vec<(HandlerKind, String)> {
        let mut kinds: Vec<(HandlerKind, String)> = self
            .import_handlers
            .values()
            .map(|h| (h.kind(), h.notice()))
            .collect();
        kinds.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        kinds
    }

    pub fn export_len(&self) -> usize {
        self.export_handlers.len()
    }

    pub fn import_len(&self) -> usize {
        self.import_handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryResult;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value as JsonValue};

    struct StaticExportHandler {
        kind: &'static str,
        payload: JsonValue,
    }

    #[async_trait]
    impl ExportHandler for StaticExportHandler {
        fn kind(&self) -> HandlerKind {
            HandlerKind::new(self.kind)
        }

        fn notice(&self) -> String {
            format!("Exports {}.", self.kind)
        }

        async fn export(&self) -> RegistryResult<Map<String, JsonValue>> {
            let mut sections = Map::new();
            sections.insert(self.kind.to_string(), self.payload.clone());
            Ok(sections)
        }
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let mut registry = HandlerRegistry::new();
        registry.register_export_handler(Arc::new(StaticExportHandler {
            kind: "general_tab",
            payload: json!({"v": 1}),
        }));
        registry.register_export_handler(Arc::new(StaticExportHandler {
            kind: "general_tab",
            payload: json!({"v": 2}),
        }));

        assert_eq!(registry.export_len(), 1);
        let handler = registry.export_handler(&HandlerKind::new("general_tab")).unwrap();
        let sections = handler.export().await.unwrap();
        assert_eq!(sections["general_tab"], json!({"v": 2}));
    }

    #[test]
    fn kinds_listing_is_sorted() {
        let mut registry = HandlerRegistry::new();
        registry.register_export_handler(Arc::new(StaticExportHandler {
            kind: "shipping",
            payload: json!({}),
        }));
        registry.register_export_handler(Arc::new(StaticExportHandler {
            kind: "general_tab",
            payload: json!({}),
        }));

        let kinds: Vec<String> =
            registry.export_kinds().into_iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(kinds, vec!["general_tab", "shipping"]);
    }
}
