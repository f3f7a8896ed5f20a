//! Platform catalogs: which payment gateways exist and which options each
//! settings tab carries. Shipped with built-in defaults, overridable from a
//! YAML or JSON file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use storeport_core::{
    store::{GatewayCatalog, SettingsCatalog},
    CoreResult, GatewayInfo, OptionDescriptor,
};
use thiserror::Error;

/// Prefix of the options the platform's own gateways and methods store
/// their settings under; extension gateways carry their own prefix.
pub const PLATFORM_PLUGIN_PREFIX: &str = "storefront_";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported catalog file format: {0}")]
    UnsupportedFormat(String),
}

fn read_catalog_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some(ext) => Err(CatalogError::UnsupportedFormat(ext.to_string())),
        None => Err(CatalogError::UnsupportedFormat("no extension".to_string())),
    }
}

/// Gateway catalog backed by a static list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileGatewayCatalog {
    gateways: Vec<GatewayInfo>,
}

impl FileGatewayCatalog {
    pub fn new(gateways: Vec<GatewayInfo>) -> Self {
        Self { gateways }
    }

    /// The gateways a stock installation ships with
    pub fn builtin() -> Self {
        let platform = |id: &str| GatewayInfo {
            id: id.to_string(),
            plugin_id: PLATFORM_PLUGIN_PREFIX.to_string(),
        };
        Self {
            gateways: vec![
                platform("bacs"),
                platform("cheque"),
                platform("cod"),
                platform("paypal"),
                GatewayInfo { id: "stripe".to_string(), plugin_id: "stripe_gateway_".to_string() },
            ],
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        read_catalog_file(path)
    }
}

#[async_trait]
impl GatewayCatalog for FileGatewayCatalog {
    async fn gateways(&self) -> CoreResult<Vec<GatewayInfo>> {
        Ok(self.gateways.clone())
    }
}

/// Settings catalog backed by a tab -> descriptors map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSettingsCatalog {
    tabs: HashMap<String, Vec<OptionDescriptor>>,
}

impl FileSettingsCatalog {
    pub fn new(tabs: HashMap<String, Vec<OptionDescriptor>>) -> Self {
        Self { tabs }
    }

    /// The settings fields a stock installation exposes per tab
    pub fn builtin() -> Self {
        let descriptor = |id: &str, default: serde_json::Value| OptionDescriptor {
            id: id.to_string(),
            default,
        };

        let mut tabs = HashMap::new();
        tabs.insert(
            "general".to_string(),
            vec![
                descriptor("store_address", json!("")),
                descriptor("store_city", json!("")),
                descriptor("store_postcode", json!("")),
                descriptor("default_country", json!("US:OR")),
                descriptor("allowed_countries", json!("all")),
                descriptor("currency", json!("USD")),
                descriptor("currency_position", json!("left")),
                descriptor("price_decimal_sep", json!(".")),
                descriptor("price_thousand_sep", json!(",")),
                descriptor("price_num_decimals", json!("2")),
                descriptor("enable_coupons", json!("yes")),
            ],
        );
        tabs.insert(
            "products".to_string(),
            vec![
                descriptor("shop_page_id", json!("")),
                descriptor("cart_redirect_after_add", json!("no")),
                descriptor("weight_unit", json!("kg")),
                descriptor("dimension_unit", json!("cm")),
                descriptor("enable_reviews", json!("yes")),
                descriptor("review_rating_required", json!("yes")),
                descriptor("manage_stock", json!("yes")),
                descriptor("notify_low_stock_amount", json!("2")),
                descriptor("hide_out_of_stock_items", json!("no")),
            ],
        );
        tabs.insert(
            "tax".to_string(),
            vec![
                descriptor("prices_include_tax", json!("no")),
                descriptor("tax_based_on", json!("shipping")),
                descriptor("tax_round_at_subtotal", json!("no")),
                descriptor("tax_display_shop", json!("excl")),
                descriptor("tax_display_cart", json!("excl")),
                descriptor("tax_total_display", json!("itemized")),
            ],
        );
        tabs.insert(
            "accounts".to_string(),
            vec![
                descriptor("enable_guest_checkout", json!("yes")),
                descriptor("enable_checkout_login_reminder", json!("no")),
                descriptor("enable_signup_and_login_from_checkout", json!("no")),
                descriptor("enable_myaccount_registration", json!("no")),
                descriptor("registration_generate_username", json!("yes")),
                descriptor("registration_generate_password", json!("yes")),
            ],
        );
        tabs.insert(
            "shipping".to_string(),
            vec![
                descriptor("enable_shipping_calc", json!("yes")),
                descriptor("shipping_cost_requires_address", json!("no")),
                descriptor("ship_to_destination", json!("billing")),
                descriptor("shipping_debug_mode", json!("no")),
            ],
        );
        tabs.insert(
            "subscriptions".to_string(),
            vec![
                descriptor("subscriptions_add_to_cart_button_text", json!("Sign up now")),
                descriptor("subscriptions_order_button_text", json!("Sign up now")),
                descriptor("subscriptions_allow_switching", json!("no")),
                descriptor("subscriptions_enable_retry", json!("no")),
                descriptor("subscriptions_max_customer_suspensions", json!("0")),
                descriptor("subscriptions_multiple_purchase", json!("no")),
            ],
        );

        Self { tabs }
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        read_catalog_file(path)
    }
}

#[async_trait]
impl SettingsCatalog for FileSettingsCatalog {
    async fn tab_options(&self, tab: &str) -> CoreResult<Vec<OptionDescriptor>> {
        Ok(self.tabs.get(tab).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn builtin_catalogs_cover_the_standard_tabs() {
        let settings = FileSettingsCatalog::builtin();
        for tab in ["general", "products", "tax", "accounts", "shipping", "subscriptions"] {
            assert!(!settings.tab_options(tab).await.unwrap().is_empty(), "empty tab {}", tab);
        }
        assert!(settings.tab_options("unknown").await.unwrap().is_empty());

        let gateways = FileGatewayCatalog::builtin();
        assert!(gateways.gateways().await.unwrap().iter().any(|g| g.id == "cod"));
    }

    #[tokio::test]
    async fn gateway_catalog_loads_from_yaml() {
        let content = r#"
gateways:
  - id: cod
    plugin_id: storefront_
  - id: invoice
    plugin_id: invoice_pay_
"#;
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let catalog = FileGatewayCatalog::from_file(file.path()).unwrap();
        let gateways = catalog.gateways().await.unwrap();
        assert_eq!(gateways.len(), 2);
        assert_eq!(gateways[1].plugin_id, "invoice_pay_");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(b"gateways = []").unwrap();
        assert!(matches!(
            FileGatewayCatalog::from_file(file.path()),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }
}
