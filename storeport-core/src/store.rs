use crate::error::CoreResult;
use crate::types::{
    GatewayInfo, NewPost, OptionDescriptor, PostRecord, ShippingClass, ShippingZone, StagedImport,
    TableRateRow,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Async trait over the platform's keyed options storage. Values are stored
/// as JSON; a missing option reads back as `None`.
#[async_trait]
pub trait OptionsStore: Send + Sync {
    async fn get_option(&self, name: &str) -> CoreResult<Option<JsonValue>>;
    /// Insert or overwrite an option
    async fn update_option(&self, name: &str, value: &JsonValue) -> CoreResult<()>;
    /// Delete an option, returns true if it existed
    async fn delete_option(&self, name: &str) -> CoreResult<bool>;
}

/// Async trait over shipping zone, method and class storage.
#[async_trait]
pub trait ShippingStore: Send + Sync {
    async fn list_classes(&self) -> CoreResult<Vec<ShippingClass>>;
    /// Insert or overwrite a class, keyed by slug
    async fn upsert_class(&self, class: &ShippingClass) -> CoreResult<()>;
    async fn list_zones(&self) -> CoreResult<Vec<ShippingZone>>;
    /// Insert a zone with its locations and method instances. The store
    /// assigns fresh zone and instance ids; the returned zone carries them,
    /// with methods in the same order as the input.
    async fn insert_zone(&self, zone: &ShippingZone) -> CoreResult<ShippingZone>;
    /// Delete a zone and everything attached to it, returns true if it existed
    async fn delete_zone(&self, zone_id: i64) -> CoreResult<bool>;
}

/// Async trait over the table-rate extension's rows. The table only exists
/// when the extension is installed; `has_table_rates` reports that.
#[async_trait]
pub trait TableRateStore: Send + Sync {
    async fn has_table_rates(&self) -> CoreResult<bool>;
    async fn list_rates(&self) -> CoreResult<Vec<TableRateRow>>;
    /// Insert a row for a method instance, returns the new rate id
    async fn insert_rate(&self, shipping_method_id: i64, data: &JsonValue) -> CoreResult<i64>;
}

/// Async trait over post storage (used by the product-filter handler).
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list_by_type(&self, post_type: &str) -> CoreResult<Vec<PostRecord>>;
    async fn get_meta(&self, post_id: i64) -> CoreResult<HashMap<String, JsonValue>>;
    /// Insert a post, returns the new post id
    async fn insert(&self, post: &NewPost) -> CoreResult<i64>;
    async fn set_meta(&self, post_id: i64, key: &str, value: &JsonValue) -> CoreResult<()>;
}

/// Read-only view of the payment gateways the platform knows about.
#[async_trait]
pub trait GatewayCatalog: Send + Sync {
    async fn gateways(&self) -> CoreResult<Vec<GatewayInfo>>;
}

/// Read-only view of the settings fields each settings tab carries.
#[async_trait]
pub trait SettingsCatalog: Send + Sync {
    /// The option descriptors for a tab; empty when the tab is unknown
    async fn tab_options(&self, tab: &str) -> CoreResult<Vec<OptionDescriptor>>;
}

/// Async trait over the single staging slot used for the import
/// confirmation round-trip.
#[async_trait]
pub trait TransientStore: Send + Sync {
    /// Park a staged import, replacing whatever was there
    async fn put_staged(&self, staged: &StagedImport) -> CoreResult<()>;
    async fn get_staged(&self) -> CoreResult<Option<StagedImport>>;
    /// Clear the slot, returns true if something was staged
    async fn clear_staged(&self) -> CoreResult<bool>;
}
