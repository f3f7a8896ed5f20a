//! Import staging command: checks, decodes and parks an uploaded package

use crate::{
    commands::{open_site, CatalogPaths},
    error::CliResult,
    utils::{validate_file_exists, ColoredOutput},
};
use std::path::Path;
use storeport_archive::read_package;
use storeport_core::HandlerKind;
use storeport_registry::{ImportHandler, Importer};
use tracing::info;

pub struct ImportCommand;

impl ImportCommand {
    pub async fn run(db_path: &str, catalogs: &CatalogPaths, file: &str) -> CliResult<()> {
        validate_file_exists(file)?;

        info!("Staging import from: {}", file);

        // Size ceiling, zip unwrapping and JSON validation happen here,
        // before anything touches the site
        let payload = read_package(Path::new(file))?;

        let (stores, registry) = open_site(db_path, catalogs).await?;
        let importer = Importer::new(registry.clone(), stores.transients.clone());

        let source_name = Path::new(file)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());
        let staged = importer.stage(&payload, &source_name).await?;

        println!("{}", ColoredOutput::success("✓ Import staged"));
        println!("Source: {}", ColoredOutput::highlight(&staged.source_name));
        println!("Sections found:");
        for key in staged.document.keys() {
            match registry.import_handler(&HandlerKind::new(key)) {
                Some(handler) => println!("  {}  {}", key, ColoredOutput::dim(&handler.notice())),
                None => println!(
                    "  {}  {}",
                    key,
                    ColoredOutput::warning("no import handler registered, will be skipped")
                ),
            }
        }
        println!(
            "\nRun '{}' or '{}' to complete the import.",
            ColoredOutput::highlight("storeport apply --all"),
            ColoredOutput::highlight("storeport apply --types <sections>")
        );

        Ok(())
    }
}
