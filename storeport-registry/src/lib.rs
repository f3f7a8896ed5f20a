pub mod error;
pub mod export;
pub mod handler;
pub mod import;
pub mod registry;

// Re-export commonly used types
pub use error::{RegistryError, RegistryResult};
pub use export::Exporter;
pub use handler::{ExportHandler, ImportHandler};
pub use import::{ImportSummary, Importer};
pub use registry::{HandlerRegistrar, HandlerRegistry, SiteStores};
