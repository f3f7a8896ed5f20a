use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use storeport_core::{
    store::{OptionsStore, PostStore, ShippingStore, TableRateStore, TransientStore},
    CoreResult, NewPost, PostRecord, ShippingClass, ShippingZone, StagedImport, TableRateRow,
};
use tokio::sync::RwLock;

/// In-memory implementation of OptionsStore for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryOptionsStore {
    data: Arc<RwLock<HashMap<String, JsonValue>>>,
}

impl MemoryOptionsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OptionsStore for MemoryOptionsStore {
    async fn get_option(&self, name: &str) -> CoreResult<Option<JsonValue>> {
        let data = self.data.read().await;
        Ok(data.get(name).cloned())
    }

    async fn update_option(&self, name: &str, value: &JsonValue) -> CoreResult<()> {
        let mut data = self.data.write().await;
        data.insert(name.to_string(), value.clone());
        Ok(())
    }

    async fn delete_option(&self, name: &str) -> CoreResult<bool> {
        let mut data = self.data.write().await;
        Ok(data.remove(name).is_some())
    }
}

#[derive(Debug, Default)]
struct ShippingState {
    classes: HashMap<String, ShippingClass>,
    zones: Vec<ShippingZone>,
    next_zone_id: i64,
    next_instance_id: i64,
}

/// In-memory implementation of ShippingStore for testing
#[derive(Debug, Clone)]
pub struct MemoryShippingStore {
    state: Arc<RwLock<ShippingState>>,
}

impl MemoryShippingStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ShippingState {
                classes: HashMap::new(),
                zones: Vec::new(),
                next_zone_id: 1,
                next_instance_id: 1,
            })),
        }
    }
}

impl Default for MemoryShippingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShippingStore for MemoryShippingStore {
    async fn list_classes(&self) -> CoreResult<Vec<ShippingClass>> {
        let state = self.state.read().await;
        let mut classes: Vec<ShippingClass> = state.classes.values().cloned().collect();
        classes.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(classes)
    }

    async fn upsert_class(&self, class: &ShippingClass) -> CoreResult<()> {
        let mut state = self.state.write().await;
        state.classes.insert(class.slug.clone(), class.clone());
        Ok(())
    }

    async fn list_zones(&self) -> CoreResult<Vec<ShippingZone>> {
        let state = self.state.read().await;
        Ok(state.zones.clone())
    }

    async fn insert_zone(&self, zone: &ShippingZone) -> CoreResult<ShippingZone> {
        let mut state = self.state.write().await;
        let mut stored = zone.clone();
        stored.id = state.next_zone_id;
        state.next_zone_id += 1;
        for method in &mut stored.methods {
            method.instance_id = state.next_instance_id;
            state.next_instance_id += 1;
        }
        state.zones.push(stored.clone());
        Ok(stored)
    }

    async fn delete_zone(&self, zone_id: i64) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.zones.len();
        state.zones.retain(|z| z.id != zone_id);
        Ok(state.zones.len() < before)
    }
}

#[derive(Debug)]
struct TableRateState {
    rates: Vec<TableRateRow>,
    next_rate_id: i64,
}

/// In-memory implementation of TableRateStore for testing. `not_installed`
/// models a site without the table-rate extension.
#[derive(Debug, Clone)]
pub struct MemoryTableRateStore {
    installed: bool,
    state: Arc<RwLock<TableRateState>>,
}

impl MemoryTableRateStore {
    pub fn new() -> Self {
        Self {
            installed: true,
            state: Arc::new(RwLock::new(TableRateState { rates: Vec::new(), next_rate_id: 1 })),
        }
    }

    pub fn not_installed() -> Self {
        let mut store = Self::new();
        store.installed = false;
        store
    }
}

impl Default for MemoryTableRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableRateStore for MemoryTableRateStore {
    async fn has_table_rates(&self) -> CoreResult<bool> {
        if !self.installed {
            return Ok(false);
        }
        let state = self.state.read().await;
        Ok(!state.rates.is_empty())
    }

    async fn list_rates(&self) -> CoreResult<Vec<TableRateRow>> {
        let state = self.state.read().await;
        Ok(state.rates.clone())
    }

    async fn insert_rate(&self, shipping_method_id: i64, data: &JsonValue) -> CoreResult<i64> {
        let mut state = self.state.write().await;
        let rate_id = state.next_rate_id;
        state.next_rate_id += 1;
        state.rates.push(TableRateRow { rate_id, shipping_method_id, data: data.clone() });
        Ok(rate_id)
    }
}

#[derive(Debug, Default)]
struct PostState {
    posts: Vec<PostRecord>,
    meta: HashMap<i64, HashMap<String, JsonValue>>,
    next_post_id: i64,
}

/// In-memory implementation of PostStore for testing
#[derive(Debug, Clone)]
pub struct MemoryPostStore {
    state: Arc<RwLock<PostState>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(PostState {
                posts: Vec::new(),
                meta: HashMap::new(),
                next_post_id: 1,
            })),
        }
    }
}

impl Default for MemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_by_type(&self, post_type: &str) -> CoreResult<Vec<PostRecord>> {
        let state = self.state.read().await;
        Ok(state.posts.iter().filter(|p| p.post_type == post_type).cloned().collect())
    }

    async fn get_meta(&self, post_id: i64) -> CoreResult<HashMap<String, JsonValue>> {
        let state = self.state.read().await;
        Ok(state.meta.get(&post_id).cloned().unwrap_or_default())
    }

    async fn insert(&self, post: &NewPost) -> CoreResult<i64> {
        let mut state = self.state.write().await;
        let id = state.next_post_id;
        state.next_post_id += 1;
        state.posts.push(PostRecord {
            id,
            post_type: post.post_type.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            status: post.status.clone(),
            parent: post.parent,
            menu_order: post.menu_order,
        });
        Ok(id)
    }

    async fn set_meta(&self, post_id: i64, key: &str, value: &JsonValue) -> CoreResult<()> {
        let mut state = self.state.write().await;
        state.meta.entry(post_id).or_default().insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// In-memory implementation of the single staging slot for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryTransientStore {
    slot: Arc<RwLock<Option<StagedImport>>>,
}

impl MemoryTransientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransientStore for MemoryTransientStore {
    async fn put_staged(&self, staged: &StagedImport) -> CoreResult<()> {
        let mut slot = self.slot.write().await;
        *slot = Some(staged.clone());
        Ok(())
    }

    async fn get_staged(&self) -> CoreResult<Option<StagedImport>> {
        let slot = self.slot.read().await;
        Ok(slot.clone())
    }

    async fn clear_staged(&self) -> CoreResult<bool> {
        let mut slot = self.slot.write().await;
        Ok(slot.take().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use storeport_core::{ConfigDocument, ShippingMethodInstance};

    #[tokio::test]
    async fn test_memory_options_store() {
        let store = MemoryOptionsStore::new();

        store.update_option("store_city", &json!("Portland")).await.unwrap();
        assert_eq!(store.get_option("store_city").await.unwrap(), Some(json!("Portland")));

        store.update_option("store_city", &json!("Salem")).await.unwrap();
        assert_eq!(store.get_option("store_city").await.unwrap(), Some(json!("Salem")));

        assert!(store.delete_option("store_city").await.unwrap());
        assert!(!store.delete_option("store_city").await.unwrap());
        assert_eq!(store.get_option("store_city").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_shipping_store_assigns_ids() {
        let store = MemoryShippingStore::new();

        let zone = ShippingZone {
            id: 0,
            name: "Domestic".to_string(),
            order: 0,
            locations: vec![],
            methods: vec![
                ShippingMethodInstance {
                    instance_id: 0,
                    method_id: "flat_rate".to_string(),
                    enabled: true,
                    order: 1,
                    settings: json!({"cost": "5.00"}),
                },
                ShippingMethodInstance {
                    instance_id: 0,
                    method_id: "free_shipping".to_string(),
                    enabled: false,
                    order: 2,
                    settings: json!({}),
                },
            ],
        };

        let stored = store.insert_zone(&zone).await.unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.methods[0].instance_id, 1);
        assert_eq!(stored.methods[1].instance_id, 2);

        let zones = store.list_zones().await.unwrap();
        assert_eq!(zones.len(), 1);

        assert!(store.delete_zone(1).await.unwrap());
        assert!(store.list_zones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_table_rate_store() {
        let store = MemoryTableRateStore::new();
        assert!(!store.has_table_rates().await.unwrap());

        store.insert_rate(7, &json!({"rate_cost": "3.00"})).await.unwrap();
        assert!(store.has_table_rates().await.unwrap());
        assert_eq!(store.list_rates().await.unwrap().len(), 1);

        let absent = MemoryTableRateStore::not_installed();
        assert!(!absent.has_table_rates().await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_post_store() {
        let store = MemoryPostStore::new();

        let id = store
            .insert(&NewPost {
                post_type: "product_filter".to_string(),
                title: "Sidebar filters".to_string(),
                slug: "sidebar-filters".to_string(),
                status: "publish".to_string(),
                parent: 0,
                menu_order: 0,
            })
            .await
            .unwrap();

        store.set_meta(id, "layout", &json!("vertical")).await.unwrap();

        let posts = store.list_by_type("product_filter").await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, id);

        let meta = store.get_meta(id).await.unwrap();
        assert_eq!(meta.get("layout"), Some(&json!("vertical")));
    }

    #[tokio::test]
    async fn test_memory_transient_store_single_slot() {
        let store = MemoryTransientStore::new();
        assert!(store.get_staged().await.unwrap().is_none());

        let first = StagedImport {
            id: "a".to_string(),
            source_name: "first.json".to_string(),
            document: ConfigDocument::new(),
            staged_at: Utc::now(),
        };
        let second = StagedImport { id: "b".to_string(), source_name: "second.json".to_string(), ..first.clone() };

        store.put_staged(&first).await.unwrap();
        store.put_staged(&second).await.unwrap();

        let staged = store.get_staged().await.unwrap().unwrap();
        assert_eq!(staged.id, "b");

        assert!(store.clear_staged().await.unwrap());
        assert!(!store.clear_staged().await.unwrap());
    }
}
