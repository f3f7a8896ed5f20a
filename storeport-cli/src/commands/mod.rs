pub mod apply;
pub mod delete_zones;
pub mod export;
pub mod import;
pub mod list;
pub mod migrate;

// Re-export command handlers
pub use apply::ApplyCommand;
pub use delete_zones::DeleteZonesCommand;
pub use export::ExportCommand;
pub use import::ImportCommand;
pub use list::ListCommand;
pub use migrate::MigrateCommand;

use crate::error::CliResult;
use std::path::Path;
use std::sync::Arc;
use storeport_core::store::{GatewayCatalog, SettingsCatalog};
use storeport_handlers::catalog::{FileGatewayCatalog, FileSettingsCatalog};
use storeport_registry::{HandlerRegistry, SiteStores};
use storeport_store::SqlStore;

/// Catalog overrides taken from the global CLI flags
#[derive(Debug, Default, Clone)]
pub struct CatalogPaths {
    pub gateways: Option<String>,
    pub settings: Option<String>,
}

/// Opens the site database and builds the registry every command works
/// against: one SqlStore behind every store trait, catalogs from files when
/// overridden, built-ins otherwise.
pub(crate) async fn open_site(
    db_path: &str,
    catalogs: &CatalogPaths,
) -> CliResult<(SiteStores, Arc<HandlerRegistry>)> {
    let store = Arc::new(SqlStore::new(db_path).await?);

    let gateways: Arc<dyn GatewayCatalog> = match catalogs.gateways.as_deref() {
        Some(path) => Arc::new(FileGatewayCatalog::from_file(Path::new(path))?),
        None => Arc::new(FileGatewayCatalog::builtin()),
    };
    let settings: Arc<dyn SettingsCatalog> = match catalogs.settings.as_deref() {
        Some(path) => Arc::new(FileSettingsCatalog::from_file(Path::new(path))?),
        None => Arc::new(FileSettingsCatalog::builtin()),
    };

    let stores = SiteStores {
        options: store.clone(),
        shipping: store.clone(),
        table_rates: store.clone(),
        posts: store.clone(),
        transients: store,
        gateways,
        settings,
    };
    let registry = Arc::new(storeport_handlers::build_registry(&stores));

    Ok((stores, registry))
}
