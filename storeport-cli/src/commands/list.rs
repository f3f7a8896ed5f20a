//! Listing command for handlers and the staged import

use crate::{
    cli::ListResource,
    commands::{open_site, CatalogPaths},
    error::CliResult,
    utils::ColoredOutput,
};

pub struct ListCommand;

impl ListCommand {
    pub async fn run(db_path: &str, catalogs: &CatalogPaths, resource: ListResource) -> CliResult<()> {
        let (stores, registry) = open_site(db_path, catalogs).await?;

        match resource {
            ListResource::Handlers => {
                println!("{}", ColoredOutput::info("Export handlers:"));
                for (kind, notice) in registry.export_kinds() {
                    println!("  {}  {}", ColoredOutput::highlight(kind.as_str()), notice);
                }

                println!("{}", ColoredOutput::info("Import handlers:"));
                for (kind, notice) in registry.import_kinds() {
                    println!("  {}  {}", ColoredOutput::highlight(kind.as_str()), notice);
                }
            }
            ListResource::Staged => {
                use storeport_core::store::TransientStore;
                match stores.transients.get_staged().await? {
                    None => println!("Nothing is staged."),
                    Some(staged) => {
                        println!("Source: {}", ColoredOutput::highlight(&staged.source_name));
                        println!("Staged at: {}", staged.staged_at);
                        println!("Sections:");
                        for key in staged.document.keys() {
                            println!("  {}", key);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
