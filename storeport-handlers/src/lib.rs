//! The feature modules: one export/import handler pair per configuration
//! domain, plus the platform catalogs they consult.

pub mod catalog;
pub mod payments;
pub mod product_filters;
pub mod settings_tabs;
pub mod shipping;
pub mod subscriptions;

use storeport_registry::{HandlerRegistrar, HandlerRegistry, SiteStores};

/// Return all registrars in their standard registration order
pub fn registrars() -> Vec<HandlerRegistrar> {
    vec![
        shipping::register,
        payments::register,
        settings_tabs::register,
        subscriptions::register,
        product_filters::register,
    ]
}

/// Build a registry with every feature module registered
pub fn build_registry(stores: &SiteStores) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for registrar in registrars() {
        registrar(&mut registry, stores);
    }
    registry
}


#[cfg(test)]
mod tests {
    use super::*;
    use storeport_core::HandlerKind;

    #[test]
    fn standard_registry_covers_every_section() {
        let stores = test_support::memory_stores();
        let registry = build_registry(&stores);

        for kind in [
            "shipping",
            "payment_gateways",
            "general_tab",
            "products_tab",
            "tax_tab",
            "accounts_tab",
            "subscriptions_tab",
            "product_filters",
        ] {
            let kind = HandlerKind::new(kind);
            assert!(registry.export_handler(&kind).is_some(), "missing export {}", kind);
            assert!(registry.import_handler(&kind).is_some(), "missing import {}", kind);
        }
    }
}
