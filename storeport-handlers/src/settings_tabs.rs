//! Settings tab export/import: one generic mechanism shared by every tab

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use storeport_core::{
    store::{OptionsStore, SettingsCatalog},
    ConfigDocument, HandlerKind,
};
use storeport_registry::{
    ExportHandler, HandlerRegistry, ImportHandler, RegistryError, RegistryResult, SiteStores,
};
use tracing::{info, warn};

/// Reads every option a tab lists in the settings catalog, falling back to
/// the cataloged default for options that were never saved.
pub(crate) async fn collect_tab_settings(
    options: &Arc<dyn OptionsStore>,
    catalog: &Arc<dyn SettingsCatalog>,
    tab: &str,
) -> RegistryResult<Map<String, JsonValue>> {
    let descriptors = catalog.tab_options(tab).await?;
    if descriptors.is_empty() {
        warn!(tab, "settings catalog lists no options for this tab");
    }

    let mut settings = Map::new();
    for descriptor in descriptors {
        let value = options
            .get_option(&descriptor.id)
            .await?
            .unwrap_or_else(|| descriptor.default.clone());
        settings.insert(descriptor.id, value);
    }
    Ok(settings)
}

/// Generic export handler for one settings tab
pub struct SettingsTabExport {
    kind: HandlerKind,
    tab: String,
    notice: String,
    options: Arc<dyn OptionsStore>,
    catalog: Arc<dyn SettingsCatalog>,
}

impl SettingsTabExport {
    pub fn new(
        kind: &str,
        tab: &str,
        notice: &str,
        options: Arc<dyn OptionsStore>,
        catalog: Arc<dyn SettingsCatalog>,
    ) -> Self {
        Self {
            kind: HandlerKind::new(kind),
            tab: tab.to_string(),
            notice: notice.to_string(),
            options,
            catalog,
        }
    }
}

#[async_trait]
impl ExportHandler for SettingsTabExport {
    fn kind(&self) -> HandlerKind {
        self.kind.clone()
    }

    fn notice(&self) -> String {
        self.notice.clone()
    }

    async fn export(&self) -> RegistryResult<Map<String, JsonValue>> {
        let settings = collect_tab_settings(&self.options, &self.catalog, &self.tab).await?;
        info!(tab = %self.tab, options = settings.len(), "exported settings tab");

        let mut sections = Map::new();
        sections.insert(self.kind.to_string(), JsonValue::Object(settings));
        Ok(sections)
    }
}

/// Generic import handler for one settings tab
pub struct SettingsTabImport {
    kind: HandlerKind,
    notice: String,
    options: Arc<dyn OptionsStore>,
}

impl SettingsTabImport {
    pub fn new(kind: &str, notice: &str, options: Arc<dyn OptionsStore>) -> Self {
        Self { kind: HandlerKind::new(kind), notice: notice.to_string(), options }
    }
}

#[async_trait]
impl ImportHandler for SettingsTabImport {
    fn kind(&self) -> HandlerKind {
        self.kind.clone()
    }

    fn notice(&self) -> String {
        self.notice.clone()
    }

    async fn import(&self, document: &ConfigDocument) -> RegistryResult<()> {
        let section = document.get(self.kind.as_str()).ok_or_else(|| {
            RegistryError::ImportFailed(format!("document has no {} section", self.kind))
        })?;
        let settings = section.as_object().ok_or_else(|| {
            RegistryError::ImportFailed(format!("{} section must be an object", self.kind))
        })?;

        for (option, value) in settings {
            self.options.update_option(option, value).await?;
        }
        info!(kind = %self.kind, options = settings.len(), "imported settings tab");

        Ok(())
    }
}

/// Registers the stock settings tabs: general, products, tax and accounts.
/// The subscriptions tab registers from its own module.
pub fn register(registry: &mut HandlerRegistry, stores: &SiteStores) {
    let tabs: [(&str, &str, &str, &str); 4] = [
        (
            "general_tab",
            "general",
            "Exports the settings from the General settings tab.",
            "Imports General tab settings, overwriting saved options.",
        ),
        (
            "products_tab",
            "products",
            "Exports the settings from the Products settings tab.",
            "Imports Products tab settings, overwriting saved options.",
        ),
        (
            "tax_tab",
            "tax",
            "Exports the settings from the Tax settings tab.",
            "Imports Tax tab settings, overwriting saved options.",
        ),
        (
            "accounts_tab",
            "accounts",
            "Exports the settings from the Accounts settings tab.",
            "Imports Accounts tab settings, overwriting saved options.",
        ),
    ];

    for (kind, tab, export_notice, import_notice) in tabs {
        registry.register_export_handler(Arc::new(SettingsTabExport::new(
            kind,
            tab,
            export_notice,
            stores.options.clone(),
            stores.settings.clone(),
        )));
        registry.register_import_handler(Arc::new(SettingsTabImport::new(
            kind,
            import_notice,
            stores.options.clone(),
        )));
    }
}
