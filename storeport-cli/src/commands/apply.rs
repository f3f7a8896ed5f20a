//! Import completion command: dispatches the staged document's confirmed
//! sections to their handlers

use crate::{
    commands::{open_site, CatalogPaths},
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use storeport_core::HandlerKind;
use storeport_registry::{Importer, RegistryError};
use tracing::info;

pub struct ApplyCommand;

impl ApplyCommand {
    pub async fn run(
        db_path: &str,
        catalogs: &CatalogPaths,
        types: Vec<String>,
        all: bool,
    ) -> CliResult<()> {
        if !all && types.is_empty() {
            return Err(CliError::InvalidArgument(
                "pass --all or --types to confirm which sections to apply".to_string(),
            ));
        }

        let (stores, registry) = open_site(db_path, catalogs).await?;
        let importer = Importer::new(registry, stores.transients.clone());

        let confirmed: Vec<HandlerKind> = if all {
            let staged = importer.staged().await?.ok_or(RegistryError::NothingStaged)?;
            staged.document.keys().map(HandlerKind::new).collect()
        } else {
            types.into_iter().map(HandlerKind::new).collect()
        };

        info!("Applying staged import");
        let summary = importer.complete(&confirmed).await?;

        println!("{}", ColoredOutput::success("✓ Import completed"));
        println!("Applied: {}", ColoredOutput::highlight(&summary.applied.len().to_string()));
        for kind in &summary.applied {
            println!("  {}", kind);
        }

        if !summary.skipped_unconfirmed.is_empty() {
            println!("{}", ColoredOutput::warning("⚠ Skipped (not confirmed):"));
            for key in &summary.skipped_unconfirmed {
                println!("  {}", key);
            }
        }
        if !summary.skipped_unregistered.is_empty() {
            println!("{}", ColoredOutput::warning("⚠ Skipped (no handler registered):"));
            for key in &summary.skipped_unregistered {
                println!("  {}", key);
            }
        }

        Ok(())
    }
}
