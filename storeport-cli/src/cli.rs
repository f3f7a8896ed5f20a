//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "storeport",
    about = "Storeport - storefront configuration export/import toolkit",
    version,
    author = "Storeport Team"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file path
    #[arg(
        long,
        env = "STOREPORT_DB_PATH",
        default_value = "./data/storeport.db",
        help = "Path to SQLite database file"
    )]
    pub db_path: String,

    /// Override the built-in payment gateway catalog
    #[arg(long, help = "Gateway catalog file (YAML or JSON)")]
    pub gateway_catalog: Option<String>,

    /// Override the built-in settings tab catalog
    #[arg(long, help = "Settings tab catalog file (YAML or JSON)")]
    pub settings_catalog: Option<String>,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database and run migrations
    Migrate,

    /// List registered handlers or the staged import
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Export confirmed sections to a package file
    Export {
        /// Directory the package file is written into
        #[arg(help = "Output directory for the package file")]
        out_dir: String,

        /// Sections to export (default: all registered)
        #[arg(
            short,
            long,
            value_delimiter = ',',
            help = "Sections to export (e.g., shipping,payment_gateways)"
        )]
        types: Vec<String>,

        /// Filename prefix; the date and extension are appended
        #[arg(long, default_value = "storeport-export", help = "Package filename prefix")]
        prefix: String,

        /// Wrap the JSON document in a zip archive
        #[arg(long, help = "Write a zip archive instead of bare JSON")]
        zip: bool,

        /// Pretty print JSON output
        #[arg(long, help = "Pretty print JSON output")]
        pretty: bool,
    },

    /// Decode, sanitize and stage an uploaded package
    Import {
        /// Package file to stage
        #[arg(help = "Package file to stage (.json or .zip)")]
        file: String,
    },

    /// Apply the staged import
    Apply {
        /// Sections to confirm
        #[arg(
            short,
            long,
            value_delimiter = ',',
            conflicts_with = "all",
            help = "Sections to confirm (e.g., shipping,general_tab)"
        )]
        types: Vec<String>,

        /// Confirm every staged section
        #[arg(long, help = "Confirm every section of the staged document")]
        all: bool,
    },

    /// Delete ALL shipping zones
    DeleteZones {
        /// Required confirmation
        #[arg(long, help = "Actually delete every shipping zone")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// Registered export and import handlers
    Handlers,
    /// The currently staged import document
    Staged,
}
