//! Product filter export/import: filter projects and their items are posts
//! with metadata; item posts point at their project through `parent`.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use storeport_core::{
    store::PostStore, ConfigDocument, HandlerKind, NewPost, PostRecord,
};
use storeport_registry::{
    ExportHandler, HandlerRegistry, ImportHandler, RegistryError, RegistryResult, SiteStores,
};
use tracing::{info, warn};

pub const KIND: &str = "product_filters";

const FILTER_POST_TYPE: &str = "product_filter";
const ITEM_POST_TYPE: &str = "product_filter_item";

pub struct ProductFiltersExport {
    posts: Arc<dyn PostStore>,
}

impl ProductFiltersExport {
    async fn collect(
        &self,
        post_type: &str,
    ) -> RegistryResult<(Vec<PostRecord>, Map<String, JsonValue>)> {
        let posts = self.posts.list_by_type(post_type).await?;

        let mut meta_by_id = Map::new();
        for post in &posts {
            let meta = self.posts.get_meta(post.id).await?;
            let meta: Map<String, JsonValue> = meta.into_iter().collect();
            meta_by_id.insert(post.id.to_string(), JsonValue::Object(meta));
        }

        Ok((posts, meta_by_id))
    }
}

#[async_trait]
impl ExportHandler for ProductFiltersExport {
    fn kind(&self) -> HandlerKind {
        HandlerKind::new(KIND)
    }

    fn notice(&self) -> String {
        "Exports product filter projects and their filter items.".to_string()
    }

    async fn export(&self) -> RegistryResult<Map<String, JsonValue>> {
        let (filters, filter_meta) = self.collect(FILTER_POST_TYPE).await?;
        let (items, item_meta) = self.collect(ITEM_POST_TYPE).await?;
        info!(filters = filters.len(), items = items.len(), "product filters found");

        let mut section = Map::new();
        section.insert("filters".to_string(), serde_json::to_value(&filters)?);
        section.insert("filter_meta".to_string(), JsonValue::Object(filter_meta));
        section.insert("items".to_string(), serde_json::to_value(&items)?);
        section.insert("item_meta".to_string(), JsonValue::Object(item_meta));

        let mut sections = Map::new();
        sections.insert(KIND.to_string(), JsonValue::Object(section));
        Ok(sections)
    }
}

pub struct ProductFiltersImport {
    posts: Arc<dyn PostStore>,
}

impl ProductFiltersImport {
    /// Insert one exported post, apply its metadata, return the new id.
    /// Failures are logged per record and do not abort the handler.
    async fn insert_post(
        &self,
        record: &PostRecord,
        parent: i64,
        meta: Option<&JsonValue>,
    ) -> RegistryResult<Option<i64>> {
        let post = NewPost {
            post_type: record.post_type.clone(),
            title: record.title.clone(),
            slug: record.slug.clone(),
            status: record.status.clone(),
            parent,
            menu_order: record.menu_order,
        };

        let id = match self.posts.insert(&post).await {
            Ok(id) => id,
            Err(e) => {
                warn!(title = %record.title, error = %e, "inserting filter post failed");
                return Ok(None);
            }
        };

        if let Some(JsonValue::Object(meta)) = meta {
            for (key, value) in meta {
                self.posts.set_meta(id, key, value).await?;
            }
        }

        Ok(Some(id))
    }
}

#[async_trait]
impl ImportHandler for ProductFiltersImport {
    fn kind(&self) -> HandlerKind {
        HandlerKind::new(KIND)
    }

    fn notice(&self) -> String {
        "Imports product filter projects and their filter items.".to_string()
    }

    async fn import(&self, document: &ConfigDocument) -> RegistryResult<()> {
        let section = document.get(KIND).ok_or_else(|| {
            RegistryError::ImportFailed("document has no product_filters section".into())
        })?;

        let filters: Vec<PostRecord> = match section.get("filters") {
            Some(filters) => serde_json::from_value(filters.clone())?,
            None => Vec::new(),
        };
        let items: Vec<PostRecord> = match section.get("items") {
            Some(items) => serde_json::from_value(items.clone())?,
            None => Vec::new(),
        };
        let filter_meta = section.get("filter_meta");
        let item_meta = section.get("item_meta");

        // Old project id -> new project id; items hang off this
        let mut processed: HashMap<i64, i64> = HashMap::new();

        for filter in &filters {
            let meta = filter_meta.and_then(|m| m.get(filter.id.to_string()));
            if let Some(id) = self.insert_post(filter, 0, meta).await? {
                processed.insert(filter.id, id);
            }
        }

        for item in &items {
            // If the parent project didn't make it in, don't import its items
            let Some(&parent) = processed.get(&item.parent) else {
                warn!(item = %item.title, parent = item.parent, "parent filter missing, skipping item");
                continue;
            };
            let meta = item_meta.and_then(|m| m.get(item.id.to_string()));
            self.insert_post(item, parent, meta).await?;
        }

        info!(filters = processed.len(), items = items.len(), "imported product filters");
        Ok(())
    }
}

pub fn register(registry: &mut HandlerRegistry, stores: &SiteStores) {
    registry.register_export_handler(Arc::new(ProductFiltersExport {
        posts: stores.posts.clone(),
    }));
    registry.register_import_handler(Arc::new(ProductFiltersImport {
        posts: stores.posts.clone(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_stores;
    use serde_json::json;

    async fn seed_project(stores: &SiteStores, title: &str) -> i64 {
        let id = stores
            .posts
            .insert(&NewPost {
                post_type: FILTER_POST_TYPE.to_string(),
                title: title.to_string(),
                slug: title.to_lowercase().replace(' ', "-"),
                status: "publish".to_string(),
                parent: 0,
                menu_order: 0,
            })
            .await
            .unwrap();
        stores.posts.set_meta(id, "layout", &json!("vertical")).await.unwrap();
        id
    }

    async fn seed_item(stores: &SiteStores, parent: i64, title: &str) -> i64 {
        stores
            .posts
            .insert(&NewPost {
                post_type: ITEM_POST_TYPE.to_string(),
                title: title.to_string(),
                slug: title.to_lowercase().replace(' ', "-"),
                status: "publish".to_string(),
                parent,
                menu_order: 1,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn export_carries_posts_and_meta() {
        let stores = memory_stores();
        let project = seed_project(&stores, "Sidebar").await;
        seed_item(&stores, project, "Color").await;

        let mut registry = HandlerRegistry::new();
        register(&mut registry, &stores);
        let handler = registry.export_handler(&HandlerKind::new(KIND)).unwrap();

        let sections = handler.export().await.unwrap();
        let section = sections[KIND].as_object().unwrap();

        assert_eq!(section["filters"].as_array().unwrap().len(), 1);
        assert_eq!(section["items"].as_array().unwrap().len(), 1);
        assert_eq!(section["filter_meta"][&project.to_string()]["layout"], "vertical");
    }

    #[tokio::test]
    async fn import_remaps_item_parents() {
        let source = memory_stores();
        let project = seed_project(&source, "Sidebar").await;
        seed_item(&source, project, "Color").await;

        let mut source_registry = HandlerRegistry::new();
        register(&mut source_registry, &source);
        let export = source_registry.export_handler(&HandlerKind::new(KIND)).unwrap();
        let document =
            ConfigDocument::from_value(JsonValue::Object(export.export().await.unwrap())).unwrap();

        // The target already has unrelated posts, so ids shift
        let target = memory_stores();
        seed_project(&target, "Unrelated").await;

        let mut target_registry = HandlerRegistry::new();
        register(&mut target_registry, &target);
        let import = target_registry.import_handler(&HandlerKind::new(KIND)).unwrap();
        import.import(&document).await.unwrap();

        let projects = target.posts.list_by_type(FILTER_POST_TYPE).await.unwrap();
        let imported = projects.iter().find(|p| p.title == "Sidebar").unwrap();

        let items = target.posts.list_by_type(ITEM_POST_TYPE).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].parent, imported.id);

        let meta = target.posts.get_meta(imported.id).await.unwrap();
        assert_eq!(meta.get("layout"), Some(&json!("vertical")));
    }

    #[tokio::test]
    async fn orphaned_items_are_skipped() {
        let stores = memory_stores();
        let mut registry = HandlerRegistry::new();
        register(&mut registry, &stores);

        let document = ConfigDocument::from_value(json!({
            KIND: {
                "filters": [],
                "items": [{
                    "id": 9, "post_type": ITEM_POST_TYPE, "title": "Orphan",
                    "slug": "orphan", "status": "publish", "parent": 5, "menu_order": 0
                }]
            }
        }))
        .unwrap();

        let import = registry.import_handler(&HandlerKind::new(KIND)).unwrap();
        import.import(&document).await.unwrap();

        assert!(stores.posts.list_by_type(ITEM_POST_TYPE).await.unwrap().is_empty());
    }
}
