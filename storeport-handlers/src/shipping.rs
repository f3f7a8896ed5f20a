//! Shipping zones, methods, classes, settings and table rates

use crate::settings_tabs::collect_tab_settings;
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use storeport_core::{
    store::{OptionsStore, SettingsCatalog, ShippingStore, TableRateStore},
    ConfigDocument, HandlerKind, ShippingClass, ShippingZone, TableRateRow,
};
use storeport_registry::{
    ExportHandler, HandlerRegistry, ImportHandler, RegistryError, RegistryResult, SiteStores,
};
use tracing::{info, warn};

pub const KIND: &str = "shipping";

fn default_priority_option(instance_id: i64) -> String {
    format!("table_rate_default_priority_{}", instance_id)
}

fn class_priorities_option(instance_id: i64) -> String {
    format!("table_rate_priorities_{}", instance_id)
}

pub struct ShippingExport {
    shipping: Arc<dyn ShippingStore>,
    table_rates: Arc<dyn TableRateStore>,
    options: Arc<dyn OptionsStore>,
    settings: Arc<dyn SettingsCatalog>,
}

impl ShippingExport {
    /// Per-instance priorities for every method that owns table rates
    async fn collect_priorities(
        &self,
        rates: &[TableRateRow],
    ) -> RegistryResult<Map<String, JsonValue>> {
        let mut priorities = Map::new();
        let mut processed: HashSet<i64> = HashSet::new();

        for rate in rates {
            if !processed.insert(rate.shipping_method_id) {
                continue;
            }
            let id = rate.shipping_method_id;
            let default = self
                .options
                .get_option(&default_priority_option(id))
                .await?
                .unwrap_or_else(|| JsonValue::from(10));
            let classes = self
                .options
                .get_option(&class_priorities_option(id))
                .await?
                .unwrap_or(JsonValue::Null);

            let mut entry = Map::new();
            entry.insert("default".to_string(), default);
            entry.insert("classes".to_string(), classes);
            priorities.insert(id.to_string(), JsonValue::Object(entry));
        }

        Ok(priorities)
    }
}

#[async_trait]
impl ExportHandler for ShippingExport {
    fn kind(&self) -> HandlerKind {
        HandlerKind::new(KIND)
    }

    fn notice(&self) -> String {
        "Exports shipping zones, methods, classes and shipping settings.".to_string()
    }

    async fn export(&self) -> RegistryResult<Map<String, JsonValue>> {
        let classes = self.shipping.list_classes().await?;
        let zones = self.shipping.list_zones().await?;
        if zones.is_empty() {
            let notice = "there are no shipping zones to export";
            warn!("{}", notice);
            return Err(RegistryError::ExportFailed(notice.to_string()));
        }
        info!(zones = zones.len(), "shipping zones found");

        let settings = collect_tab_settings(&self.options, &self.settings, "shipping").await?;

        let mut section = Map::new();
        section.insert("classes".to_string(), serde_json::to_value(&classes)?);
        section.insert("zones".to_string(), serde_json::to_value(&zones)?);
        section.insert("settings".to_string(), JsonValue::Object(settings));

        if self.table_rates.has_table_rates().await? {
            let rates = self.table_rates.list_rates().await?;
            let priorities = self.collect_priorities(&rates).await?;
            section.insert("table_rates".to_string(), serde_json::to_value(&rates)?);
            section.insert("table_rate_priorities".to_string(), JsonValue::Object(priorities));
            info!(rates = rates.len(), "table rates found, including them");
        }

        let mut sections = Map::new();
        sections.insert(KIND.to_string(), JsonValue::Object(section));
        Ok(sections)
    }
}

pub struct ShippingImport {
    shipping: Arc<dyn ShippingStore>,
    table_rates: Arc<dyn TableRateStore>,
    options: Arc<dyn OptionsStore>,
}

impl ShippingImport {
    /// Recreates the zones; returns the old instance id -> new instance id
    /// map the table-rate rows and priorities are remapped through.
    async fn import_zones(&self, zones: &[ShippingZone]) -> RegistryResult<HashMap<i64, i64>> {
        let mut instance_ids = HashMap::new();

        for zone in zones {
            let stored = self.shipping.insert_zone(zone).await?;
            for (old, new) in zone.methods.iter().zip(stored.methods.iter()) {
                instance_ids.insert(old.instance_id, new.instance_id);
            }
            info!(zone = %zone.name, methods = zone.methods.len(), "imported shipping zone");
        }

        Ok(instance_ids)
    }

    async fn import_table_rates(
        &self,
        section: &Map<String, JsonValue>,
        instance_ids: &HashMap<i64, i64>,
    ) -> RegistryResult<()> {
        if let Some(rates) = section.get("table_rates") {
            let rates: Vec<TableRateRow> = serde_json::from_value(rates.clone())?;
            for rate in &rates {
                let Some(&new_id) = instance_ids.get(&rate.shipping_method_id) else {
                    warn!(
                        rate = rate.rate_id,
                        instance = rate.shipping_method_id,
                        "method instance was not recreated, skipping table rate"
                    );
                    continue;
                };
                self.table_rates.insert_rate(new_id, &rate.data).await?;
            }
            info!(rates = rates.len(), "imported table rates");
        }

        if let Some(JsonValue::Object(priorities)) = section.get("table_rate_priorities") {
            for (old_instance, entry) in priorities {
                let Ok(old) = old_instance.parse::<i64>() else {
                    warn!(instance = %old_instance, "priority entry has a malformed instance id");
                    continue;
                };
                let Some(&new_id) = instance_ids.get(&old) else {
                    warn!(instance = old, "method instance was not recreated, skipping priorities");
                    continue;
                };

                if let Some(default) = entry.get("default") {
                    self.options
                        .update_option(&default_priority_option(new_id), default)
                        .await?;
                }
                match entry.get("classes") {
                    Some(JsonValue::Null) | None => {}
                    Some(classes) => {
                        self.options
                            .update_option(&class_priorities_option(new_id), classes)
                            .await?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ImportHandler for ShippingImport {
    fn kind(&self) -> HandlerKind {
        HandlerKind::new(KIND)
    }

    fn notice(&self) -> String {
        "Imports shipping zones, methods, classes and shipping settings.".to_string()
    }

    async fn import(&self, document: &ConfigDocument) -> RegistryResult<()> {
        let section = document
            .get(KIND)
            .ok_or_else(|| RegistryError::ImportFailed("document has no shipping section".into()))?;
        let section = section.as_object().ok_or_else(|| {
            RegistryError::ImportFailed("shipping section must be an object".into())
        })?;

        if let Some(classes) = section.get("classes") {
            let classes: Vec<ShippingClass> = serde_json::from_value(classes.clone())?;
            for class in &classes {
                self.shipping.upsert_class(class).await?;
            }
            info!(classes = classes.len(), "imported shipping classes");
        }

        let zones: Vec<ShippingZone> = match section.get("zones") {
            Some(zones) => serde_json::from_value(zones.clone())?,
            None => Vec::new(),
        };
        let instance_ids = self.import_zones(&zones).await?;

        if let Some(JsonValue::Object(settings)) = section.get("settings") {
            for (option, value) in settings {
                self.options.update_option(option, value).await?;
            }
        }

        self.import_table_rates(section, &instance_ids).await?;

        Ok(())
    }
}

pub fn register(registry: &mut HandlerRegistry, stores: &SiteStores) {
    registry.register_export_handler(Arc::new(ShippingExport {
        shipping: stores.shipping.clone(),
        table_rates: stores.table_rates.clone(),
        options: stores.options.clone(),
        settings: stores.settings.clone(),
    }));
    registry.register_import_handler(Arc::new(ShippingImport {
        shipping: stores.shipping.clone(),
        table_rates: stores.table_rates.clone(),
        options: stores.options.clone(),
    }));
}
