//! Payment gateway settings export/import

use crate::catalog::PLATFORM_PLUGIN_PREFIX;
use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use storeport_core::{
    store::{GatewayCatalog, OptionsStore},
    ConfigDocument, HandlerKind,
};
use storeport_registry::{
    ExportHandler, HandlerRegistry, ImportHandler, RegistryError, RegistryResult, SiteStores,
};
use tracing::{info, warn};

pub const KIND: &str = "payment_gateways";

/// Carried inside a gateway's settings when its options live under a
/// non-platform prefix, so the import writes them back to the right option.
const IMPORT_PLUGIN_ID_KEY: &str = "import_plugin_id";

fn settings_option(plugin_id: &str, gateway_id: &str) -> String {
    format!("{}{}_settings", plugin_id, gateway_id)
}

pub struct PaymentGatewaysExport {
    options: Arc<dyn OptionsStore>,
    gateways: Arc<dyn GatewayCatalog>,
}

#[async_trait]
impl ExportHandler for PaymentGatewaysExport {
    fn kind(&self) -> HandlerKind {
        HandlerKind::new(KIND)
    }

    fn notice(&self) -> String {
        "Exports the saved settings of every payment gateway.".to_string()
    }

    async fn export(&self) -> RegistryResult<Map<String, JsonValue>> {
        let gateways = self.gateways.gateways().await?;
        info!(gateways = gateways.len(), "payment gateways found");

        let mut settings_by_gateway = Map::new();
        for gateway in &gateways {
            let option = settings_option(&gateway.plugin_id, &gateway.id);
            let Some(value) = self.options.get_option(&option).await? else {
                continue;
            };
            // Gateways that never saved anything are left out
            let JsonValue::Object(mut settings) = value else {
                warn!(gateway = %gateway.id, "gateway settings are not an object, skipping");
                continue;
            };
            if settings.is_empty() {
                continue;
            }

            if gateway.plugin_id != PLATFORM_PLUGIN_PREFIX {
                settings.insert(IMPORT_PLUGIN_ID_KEY.to_string(), json!(gateway.plugin_id));
            }
            settings_by_gateway.insert(gateway.id.clone(), JsonValue::Object(settings));
        }

        let mut sections = Map::new();
        sections.insert(KIND.to_string(), JsonValue::Object(settings_by_gateway));
        Ok(sections)
    }
}

pub struct PaymentGatewaysImport {
    options: Arc<dyn OptionsStore>,
}

#[async_trait]
impl ImportHandler for PaymentGatewaysImport {
    fn kind(&self) -> HandlerKind {
        HandlerKind::new(KIND)
    }

    fn notice(&self) -> String {
        "Imports payment gateway settings, overwriting each gateway's saved options.".to_string()
    }

    async fn import(&self, document: &ConfigDocument) -> RegistryResult<()> {
        let section = document
            .get(KIND)
            .ok_or_else(|| RegistryError::ImportFailed("document has no payment_gateways section".into()))?;
        let gateways = section.as_object().ok_or_else(|| {
            RegistryError::ImportFailed("payment_gateways section must be an object".into())
        })?;

        for (gateway_id, settings) in gateways {
            let mut settings = settings.clone();
            let mut plugin_id = PLATFORM_PLUGIN_PREFIX.to_string();
            if let Some(map) = settings.as_object_mut() {
                if let Some(JsonValue::String(prefix)) = map.remove(IMPORT_PLUGIN_ID_KEY) {
                    plugin_id = prefix;
                }
            }

            self.options
                .update_option(&settings_option(&plugin_id, gateway_id), &settings)
                .await?;
            info!(gateway = %gateway_id, "imported gateway settings");
        }

        Ok(())
    }
}

pub fn register(registry: &mut HandlerRegistry, stores: &SiteStores) {
    registry.register_export_handler(Arc::new(PaymentGatewaysExport {
        options: stores.options.clone(),
        gateways: stores.gateways.clone(),
    }));
    registry.register_import_handler(Arc::new(PaymentGatewaysImport {
        options: stores.options.clone(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_stores;

    async fn export_section(stores: &SiteStores) -> JsonValue {
        let mut registry = HandlerRegistry::new();
        register(&mut registry, stores);
        let handler = registry.export_handler(&HandlerKind::new(KIND)).unwrap();
        let mut sections = handler.export().await.unwrap();
        sections.remove(KIND).unwrap()
    }

    #[tokio::test]
    async fn exports_only_gateways_with_saved_settings() {
        let stores = memory_stores();
        stores
            .options
            .update_option("storefront_cod_settings", &json!({"enabled": "yes", "title": "Cash"}))
            .await
            .unwrap();
        stores
            .options
            .update_option("storefront_bacs_settings", &json!({}))
            .await
            .unwrap();

        let section = export_section(&stores).await;
        let gateways = section.as_object().unwrap();
        assert_eq!(gateways.len(), 1);
        assert_eq!(gateways["cod"]["title"], "Cash");
    }

    #[tokio::test]
    async fn non_platform_gateways_carry_their_plugin_prefix() {
        let stores = memory_stores();
        stores
            .options
            .update_option("stripe_gateway_stripe_settings", &json!({"enabled": "yes"}))
            .await
            .unwrap();

        let section = export_section(&stores).await;
        assert_eq!(section["stripe"][IMPORT_PLUGIN_ID_KEY], "stripe_gateway_");
    }

    #[tokio::test]
    async fn import_writes_back_under_the_right_prefix() {
        let stores = memory_stores();
        let mut registry = HandlerRegistry::new();
        register(&mut registry, &stores);
        let handler = registry.import_handler(&HandlerKind::new(KIND)).unwrap();

        let document = ConfigDocument::from_value(json!({
            KIND: {
                "cod": {"enabled": "yes", "title": "Cash on delivery"},
                "stripe": {"enabled": "yes", IMPORT_PLUGIN_ID_KEY: "stripe_gateway_"}
            }
        }))
        .unwrap();

        handler.import(&document).await.unwrap();

        assert_eq!(
            stores.options.get_option("storefront_cod_settings").await.unwrap(),
            Some(json!({"enabled": "yes", "title": "Cash on delivery"}))
        );
        // The prefix marker is consumed, not persisted
        assert_eq!(
            stores.options.get_option("stripe_gateway_stripe_settings").await.unwrap(),
            Some(json!({"enabled": "yes"}))
        );
    }

    #[tokio::test]
    async fn export_then_import_is_idempotent() {
        let stores = memory_stores();
        stores
            .options
            .update_option("storefront_cod_settings", &json!({"enabled": "yes"}))
            .await
            .unwrap();

        let mut registry = HandlerRegistry::new();
        register(&mut registry, &stores);

        let export = registry.export_handler(&HandlerKind::new(KIND)).unwrap();
        let sections = export.export().await.unwrap();
        let document = ConfigDocument::from_value(JsonValue::Object(sections)).unwrap();

        let import = registry.import_handler(&HandlerKind::new(KIND)).unwrap();
        import.import(&document).await.unwrap();
        import.import(&document).await.unwrap();

        let second = export.export().await.unwrap();
        assert_eq!(document.get(KIND), second.get(KIND));
    }
}
