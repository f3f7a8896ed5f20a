use crate::error::{StoreError, StoreResult};
use crate::sql_store::migrations::MigrationRunner;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::PathBuf;
use storeport_core::{
    store::{OptionsStore, PostStore, ShippingStore, TableRateStore, TransientStore},
    ConfigDocument, CoreResult, NewPost, PostRecord, ShippingClass, ShippingZone, StagedImport,
    TableRateRow, ZoneLocation,
};

/// SQLite-based store implementation backing every store trait
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Create a new SqlStore from a database path or `sqlite://` URL
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        Self::new_with_config(database_url, None).await
    }

    /// Create SqlStore with custom pool configuration
    pub async fn new_with_config(
        database_url: &str,
        max_connections: Option<u32>,
    ) -> StoreResult<Self> {
        let max_conn = max_connections.unwrap_or_else(|| {
            std::env::var("STOREPORT_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5)
        });

        let path_str = database_url.strip_prefix("sqlite://").unwrap_or(database_url);
        let options = SqliteConnectOptions::new()
            .filename(PathBuf::from(path_str))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_conn)
            .connect_with(options)
            .await?;

        // Configure SQLite for better consistency
        sqlx::query("PRAGMA foreign_keys = ON;").execute(&pool).await?;
        sqlx::query("PRAGMA journal_mode = WAL;").execute(&pool).await?;

        let store = Self { pool };

        // Run migrations
        let migration_runner = MigrationRunner::new(store.pool.clone());
        migration_runner.migrate().await?;

        Ok(store)
    }

    /// Create SqlStore from existing pool (for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run migrations manually
    pub async fn migrate(&self) -> StoreResult<()> {
        let migration_runner = MigrationRunner::new(self.pool.clone());
        migration_runner.migrate().await
    }
}

fn parse_json(text: &str) -> Result<JsonValue, StoreError> {
    serde_json::from_str(text).map_err(StoreError::Serialization)
}

#[async_trait]
impl OptionsStore for SqlStore {
    async fn get_option(&self, name: &str) -> CoreResult<Option<JsonValue>> {
        let row = sqlx::query("SELECT value FROM options WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        match row {
            Some(row) => {
                let text: String = row.try_get("value").map_err(StoreError::Database)?;
                Ok(Some(parse_json(&text)?))
            }
            None => Ok(None),
        }
    }

    async fn update_option(&self, name: &str, value: &JsonValue) -> CoreResult<()> {
        let text = serde_json::to_string(value).map_err(StoreError::Serialization)?;

        // Try update by name first
        let result = sqlx::query("UPDATE options SET value = ? WHERE name = ?")
            .bind(&text)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        if result.rows_affected() == 0 {
            sqlx::query("INSERT INTO options (name, value) VALUES (?, ?)")
                .bind(name)
                .bind(&text)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Database)?;
        }

        Ok(())
    }

    async fn delete_option(&self, name: &str) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM options WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ShippingStore for SqlStore {
    async fn list_classes(&self) -> CoreResult<Vec<ShippingClass>> {
        let rows = sqlx::query("SELECT slug, name, description FROM shipping_classes ORDER BY slug")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        let mut classes = Vec::with_capacity(rows.len());
        for row in rows {
            classes.push(ShippingClass {
                slug: row.try_get("slug").map_err(StoreError::Database)?,
                name: row.try_get("name").map_err(StoreError::Database)?,
                description: row.try_get("description").map_err(StoreError::Database)?,
            });
        }
        Ok(classes)
    }

    async fn upsert_class(&self, class: &ShippingClass) -> CoreResult<()> {
        let result =
            sqlx::query("UPDATE shipping_classes SET name = ?, description = ? WHERE slug = ?")
                .bind(&class.name)
                .bind(&class.description)
                .bind(&class.slug)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Database)?;

        if result.rows_affected() == 0 {
            sqlx::query("INSERT INTO shipping_classes (slug, name, description) VALUES (?, ?, ?)")
                .bind(&class.slug)
                .bind(&class.name)
                .bind(&class.description)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Database)?;
        }

        Ok(())
    }

    async fn list_zones(&self) -> CoreResult<Vec<ShippingZone>> {
        let zone_rows =
            sqlx::query("SELECT id, name, zone_order FROM shipping_zones ORDER BY zone_order, id")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::Database)?;

        let mut zones = Vec::with_capacity(zone_rows.len());
        for row in zone_rows {
            let id: i64 = row.try_get("id").map_err(StoreError::Database)?;

            let location_rows = sqlx::query(
                "SELECT code, location_type FROM shipping_zone_locations WHERE zone_id = ?",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Database)?;

            let mut locations = Vec::with_capacity(location_rows.len());
            for loc in location_rows {
                locations.push(ZoneLocation {
                    code: loc.try_get("code").map_err(StoreError::Database)?,
                    kind: loc.try_get("location_type").map_err(StoreError::Database)?,
                });
            }

            let method_rows = sqlx::query(
                r#"
                SELECT instance_id, method_id, enabled, method_order, settings
                FROM shipping_zone_methods WHERE zone_id = ? ORDER BY method_order, instance_id
                "#,
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Database)?;

            let mut methods = Vec::with_capacity(method_rows.len());
            for m in method_rows {
                let settings_text: String = m.try_get("settings").map_err(StoreError::Database)?;
                let enabled: i64 = m.try_get("enabled").map_err(StoreError::Database)?;
                methods.push(storeport_core::ShippingMethodInstance {
                    instance_id: m.try_get("instance_id").map_err(StoreError::Database)?,
                    method_id: m.try_get("method_id").map_err(StoreError::Database)?,
                    enabled: enabled != 0,
                    order: m.try_get("method_order").map_err(StoreError::Database)?,
                    settings: parse_json(&settings_text)?,
                });
            }

            zones.push(ShippingZone {
                id,
                name: row.try_get("name").map_err(StoreError::Database)?,
                order: row.try_get("zone_order").map_err(StoreError::Database)?,
                locations,
                methods,
            });
        }

        Ok(zones)
    }

    async fn insert_zone(&self, zone: &ShippingZone) -> CoreResult<ShippingZone> {
        let result = sqlx::query("INSERT INTO shipping_zones (name, zone_order) VALUES (?, ?)")
            .bind(&zone.name)
            .bind(zone.order)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        let zone_id = result.last_insert_rowid();

        for location in &zone.locations {
            sqlx::query(
                "INSERT INTO shipping_zone_locations (zone_id, code, location_type) VALUES (?, ?, ?)",
            )
            .bind(zone_id)
            .bind(&location.code)
            .bind(&location.kind)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        }

        let mut stored = zone.clone();
        stored.id = zone_id;
        for method in &mut stored.methods {
            let settings_text =
                serde_json::to_string(&method.settings).map_err(StoreError::Serialization)?;
            let result = sqlx::query(
                r#"
                INSERT INTO shipping_zone_methods (zone_id, method_id, enabled, method_order, settings)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(zone_id)
            .bind(&method.method_id)
            .bind(if method.enabled { 1i64 } else { 0i64 })
            .bind(method.order)
            .bind(&settings_text)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
            method.instance_id = result.last_insert_rowid();
        }

        Ok(stored)
    }

    async fn delete_zone(&self, zone_id: i64) -> CoreResult<bool> {
        sqlx::query("DELETE FROM shipping_zone_locations WHERE zone_id = ?")
            .bind(zone_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        sqlx::query("DELETE FROM shipping_zone_methods WHERE zone_id = ?")
            .bind(zone_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        let result = sqlx::query("DELETE FROM shipping_zones WHERE id = ?")
            .bind(zone_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TableRateStore for SqlStore {
    async fn has_table_rates(&self) -> CoreResult<bool> {
        let row = sqlx::query("SELECT rate_id FROM shipping_table_rates LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        Ok(row.is_some())
    }

    async fn list_rates(&self) -> CoreResult<Vec<TableRateRow>> {
        let rows = sqlx::query(
            "SELECT rate_id, shipping_method_id, data FROM shipping_table_rates ORDER BY rate_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        let mut rates = Vec::with_capacity(rows.len());
        for row in rows {
            let data_text: String = row.try_get("data").map_err(StoreError::Database)?;
            rates.push(TableRateRow {
                rate_id: row.try_get("rate_id").map_err(StoreError::Database)?,
                shipping_method_id: row
                    .try_get("shipping_method_id")
                    .map_err(StoreError::Database)?,
                data: parse_json(&data_text)?,
            });
        }
        Ok(rates)
    }

    async fn insert_rate(&self, shipping_method_id: i64, data: &JsonValue) -> CoreResult<i64> {
        let data_text = serde_json::to_string(data).map_err(StoreError::Serialization)?;
        let result = sqlx::query(
            "INSERT INTO shipping_table_rates (shipping_method_id, data) VALUES (?, ?)",
        )
        .bind(shipping_method_id)
        .bind(&data_text)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl PostStore for SqlStore {
    async fn list_by_type(&self, post_type: &str) -> CoreResult<Vec<PostRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, post_type, title, slug, status, parent, menu_order
            FROM posts WHERE post_type = ? ORDER BY id
            "#,
        )
        .bind(post_type)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            posts.push(PostRecord {
                id: row.try_get("id").map_err(StoreError::Database)?,
                post_type: row.try_get("post_type").map_err(StoreError::Database)?,
                title: row.try_get("title").map_err(StoreError::Database)?,
                slug: row.try_get("slug").map_err(StoreError::Database)?,
                status: row.try_get("status").map_err(StoreError::Database)?,
                parent: row.try_get("parent").map_err(StoreError::Database)?,
                menu_order: row.try_get("menu_order").map_err(StoreError::Database)?,
            });
        }
        Ok(posts)
    }

    async fn get_meta(&self, post_id: i64) -> CoreResult<HashMap<String, JsonValue>> {
        let rows = sqlx::query("SELECT meta_key, meta_value FROM postmeta WHERE post_id = ?")
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        let mut meta = HashMap::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("meta_key").map_err(StoreError::Database)?;
            let value_text: String = row.try_get("meta_value").map_err(StoreError::Database)?;
            meta.insert(key, parse_json(&value_text)?);
        }
        Ok(meta)
    }

    async fn insert(&self, post: &NewPost) -> CoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO posts (post_type, title, slug, status, parent, menu_order)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.post_type)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.status)
        .bind(post.parent)
        .bind(post.menu_order)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;
        Ok(result.last_insert_rowid())
    }

    async fn set_meta(&self, post_id: i64, key: &str, value: &JsonValue) -> CoreResult<()> {
        let value_text = serde_json::to_string(value).map_err(StoreError::Serialization)?;

        let result =
            sqlx::query("UPDATE postmeta SET meta_value = ? WHERE post_id = ? AND meta_key = ?")
                .bind(&value_text)
                .bind(post_id)
                .bind(key)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Database)?;

        if result.rows_affected() == 0 {
            sqlx::query("INSERT INTO postmeta (post_id, meta_key, meta_value) VALUES (?, ?, ?)")
                .bind(post_id)
                .bind(key)
                .bind(&value_text)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Database)?;
        }

        Ok(())
    }
}

#[async_trait]
impl TransientStore for SqlStore {
    async fn put_staged(&self, staged: &StagedImport) -> CoreResult<()> {
        let document_text = staged.document.to_json_text(false)?;

        let result = sqlx::query(
            r#"
            UPDATE staged_imports SET id = ?, source_name = ?, document = ?, staged_at = ?
            WHERE slot = 'current'
            "#,
        )
        .bind(&staged.id)
        .bind(&staged.source_name)
        .bind(&document_text)
        .bind(staged.staged_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        if result.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO staged_imports (slot, id, source_name, document, staged_at)
                VALUES ('current', ?, ?, ?, ?)
                "#,
            )
            .bind(&staged.id)
            .bind(&staged.source_name)
            .bind(&document_text)
            .bind(staged.staged_at)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        }

        Ok(())
    }

    async fn get_staged(&self) -> CoreResult<Option<StagedImport>> {
        let row = sqlx::query(
            "SELECT id, source_name, document, staged_at FROM staged_imports WHERE slot = 'current'",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        match row {
            Some(row) => {
                let document_text: String = row.try_get("document").map_err(StoreError::Database)?;
                let document = ConfigDocument::from_value(parse_json(&document_text)?)?;
                let staged_at: DateTime<Utc> =
                    row.try_get("staged_at").map_err(StoreError::Database)?;
                Ok(Some(StagedImport {
                    id: row.try_get("id").map_err(StoreError::Database)?,
                    source_name: row.try_get("source_name").map_err(StoreError::Database)?,
                    document,
                    staged_at,
                }))
            }
            None => Ok(None),
        }
    }

    async fn clear_staged(&self) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM staged_imports WHERE slot = 'current'")
            .execute(&self.pool)
            .await
            .map_err(StoreError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storeport_core::ShippingMethodInstance;
    use tempfile::tempdir;

    async fn test_store() -> (tempfile::TempDir, SqlStore) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqlStore::new(db_path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_options_round_trip() {
        let (_dir, store) = test_store().await;

        assert_eq!(store.get_option("currency").await.unwrap(), None);

        store.update_option("currency", &json!("USD")).await.unwrap();
        assert_eq!(store.get_option("currency").await.unwrap(), Some(json!("USD")));

        store.update_option("currency", &json!("EUR")).await.unwrap();
        assert_eq!(store.get_option("currency").await.unwrap(), Some(json!("EUR")));

        assert!(store.delete_option("currency").await.unwrap());
        assert_eq!(store.get_option("currency").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zone_insert_assigns_fresh_ids() {
        let (_dir, store) = test_store().await;

        let zone = ShippingZone {
            id: 99,
            name: "Europe".to_string(),
            order: 1,
            locations: vec![ZoneLocation { code: "EU".to_string(), kind: "continent".to_string() }],
            methods: vec![ShippingMethodInstance {
                instance_id: 42,
                method_id: "flat_rate".to_string(),
                enabled: true,
                order: 1,
                settings: json!({"cost": "10"}),
            }],
        };

        let stored = store.insert_zone(&zone).await.unwrap();
        assert_ne!(stored.id, 99);
        assert_ne!(stored.methods[0].instance_id, 42);

        let zones = store.list_zones().await.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, "Europe");
        assert_eq!(zones[0].locations.len(), 1);
        assert_eq!(zones[0].methods[0].settings, json!({"cost": "10"}));

        assert!(store.delete_zone(stored.id).await.unwrap());
        assert!(store.list_zones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_rates_presence() {
        let (_dir, store) = test_store().await;
        assert!(!store.has_table_rates().await.unwrap());

        store.insert_rate(3, &json!({"rate_cost": "2.50"})).await.unwrap();
        assert!(store.has_table_rates().await.unwrap());

        let rates = store.list_rates().await.unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].shipping_method_id, 3);
    }

    #[tokio::test]
    async fn test_posts_and_meta() {
        let (_dir, store) = test_store().await;

        let id = store
            .insert(&NewPost {
                post_type: "product_filter".to_string(),
                title: "Filters".to_string(),
                slug: "filters".to_string(),
                status: "publish".to_string(),
                parent: 0,
                menu_order: 0,
            })
            .await
            .unwrap();

        store.set_meta(id, "layout", &json!("grid")).await.unwrap();
        store.set_meta(id, "layout", &json!("list")).await.unwrap();

        let posts = store.list_by_type("product_filter").await.unwrap();
        assert_eq!(posts.len(), 1);

        let meta = store.get_meta(id).await.unwrap();
        assert_eq!(meta.get("layout"), Some(&json!("list")));
    }

    #[tokio::test]
    async fn test_staging_slot_round_trip() {
        let (_dir, store) = test_store().await;
        assert!(store.get_staged().await.unwrap().is_none());

        let mut document = ConfigDocument::new();
        document.insert("general_tab", json!({"currency": "USD"}));
        let staged = StagedImport {
            id: "stage-1".to_string(),
            source_name: "export.json".to_string(),
            document,
            staged_at: Utc::now(),
        };

        store.put_staged(&staged).await.unwrap();
        let loaded = store.get_staged().await.unwrap().unwrap();
        assert_eq!(loaded.id, "stage-1");
        assert_eq!(loaded.document.get("general_tab"), Some(&json!({"currency": "USD"})));

        // Re-staging replaces the slot
        let replacement = StagedImport { id: "stage-2".to_string(), ..staged };
        store.put_staged(&replacement).await.unwrap();
        assert_eq!(store.get_staged().await.unwrap().unwrap().id, "stage-2");

        assert!(store.clear_staged().await.unwrap());
        assert!(store.get_staged().await.unwrap().is_none());
    }
}
