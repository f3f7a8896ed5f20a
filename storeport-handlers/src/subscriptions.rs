//! Subscriptions settings tab, registered from its own module because the
//! subscriptions extension is optional on a site.

use crate::settings_tabs::{SettingsTabExport, SettingsTabImport};
use std::sync::Arc;
use storeport_registry::{HandlerRegistry, SiteStores};

pub const KIND: &str = "subscriptions_tab";

pub fn register(registry: &mut HandlerRegistry, stores: &SiteStores) {
    registry.register_export_handler(Arc::new(SettingsTabExport::new(
        KIND,
        "subscriptions",
        "Exports the settings from the Subscriptions settings tab.",
        stores.options.clone(),
        stores.settings.clone(),
    )));
    registry.register_import_handler(Arc::new(SettingsTabImport::new(
        KIND,
        "Imports Subscriptions tab settings, overwriting saved options.",
        stores.options.clone(),
    )));
}
