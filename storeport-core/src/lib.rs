pub mod error;
pub mod sanitization;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use sanitization::{sanitize_document, sanitize_json_value, sanitize_scalar};
pub use types::{
    ConfigDocument, GatewayInfo, HandlerKind, NewPost, OptionDescriptor, PostRecord,
    ShippingClass, ShippingMethodInstance, ShippingZone, StagedImport, TableRateRow, ZoneLocation,
};
