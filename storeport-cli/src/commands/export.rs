//! Configuration export command

use crate::{
    commands::{open_site, CatalogPaths},
    error::CliResult,
    utils::{ensure_dir, ColoredOutput},
};
use std::path::Path;
use storeport_archive::{write_package, PackageFormat};
use storeport_core::HandlerKind;
use storeport_registry::Exporter;
use tracing::info;

pub struct ExportCommand;

impl ExportCommand {
    pub async fn run(
        db_path: &str,
        catalogs: &CatalogPaths,
        out_dir: &str,
        types: Vec<String>,
        prefix: &str,
        zip: bool,
        pretty: bool,
    ) -> CliResult<()> {
        info!("Exporting configuration to: {}", out_dir);

        let (_stores, registry) = open_site(db_path, catalogs).await?;

        // No explicit selection means everything that is registered
        let confirmed: Vec<HandlerKind> = if types.is_empty() {
            registry.export_kinds().into_iter().map(|(kind, _)| kind).collect()
        } else {
            types.into_iter().map(HandlerKind::new).collect()
        };

        let exporter = Exporter::new(registry);
        let document = exporter.export(&confirmed).await?;

        let json_text = document.to_json_text(pretty)?;
        let format = if zip { PackageFormat::Zip } else { PackageFormat::Json };

        ensure_dir(Path::new(out_dir))?;
        let path = write_package(Path::new(out_dir), prefix, &json_text, format)?;

        println!("{}", ColoredOutput::success("✓ Export completed"));
        println!("Output file: {}", ColoredOutput::highlight(&path.display().to_string()));
        println!("Sections: {}", ColoredOutput::highlight(&document.len().to_string()));
        for key in document.keys() {
            println!("  {}", key);
        }

        if document.is_empty() {
            println!("  {}", ColoredOutput::warning("⚠ No confirmed section had a handler"));
        }

        Ok(())
    }
}
