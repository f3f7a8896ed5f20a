//! Storeport CLI main entry point

use clap::Parser;
use storeport_cli::{
    cli::{Cli, Commands},
    commands::{
        ApplyCommand, CatalogPaths, DeleteZonesCommand, ExportCommand, ImportCommand, ListCommand,
        MigrateCommand,
    },
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::info;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing()?;

    // Disable colored output if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("Storeport CLI v{}", env!("CARGO_PKG_VERSION"));

    let catalogs = CatalogPaths {
        gateways: cli.gateway_catalog.clone(),
        settings: cli.settings_catalog.clone(),
    };

    match cli.command {
        Commands::Migrate => MigrateCommand::run(&cli.db_path).await,

        Commands::List { resource } => ListCommand::run(&cli.db_path, &catalogs, resource).await,

        Commands::Export { out_dir, types, prefix, zip, pretty } => {
            ExportCommand::run(&cli.db_path, &catalogs, &out_dir, types, &prefix, zip, pretty)
                .await
        }

        Commands::Import { file } => ImportCommand::run(&cli.db_path, &catalogs, &file).await,

        Commands::Apply { types, all } => {
            ApplyCommand::run(&cli.db_path, &catalogs, types, all).await
        }

        Commands::DeleteZones { yes } => {
            DeleteZonesCommand::run(&cli.db_path, &catalogs, yes).await
        }
    }
}
