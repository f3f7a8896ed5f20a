//! Support tool: wipe every shipping zone from the site

use crate::{
    commands::{open_site, CatalogPaths},
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use storeport_core::store::ShippingStore;
use tracing::info;

pub struct DeleteZonesCommand;

impl DeleteZonesCommand {
    pub async fn run(db_path: &str, catalogs: &CatalogPaths, yes: bool) -> CliResult<()> {
        if !yes {
            return Err(CliError::InvalidArgument(
                "refusing to delete all shipping zones without --yes".to_string(),
            ));
        }

        info!("Begin deleting shipping zones");
        let (stores, _) = open_site(db_path, catalogs).await?;

        let zones = stores.shipping.list_zones().await?;
        for zone in &zones {
            stores.shipping.delete_zone(zone.id).await?;
        }

        println!(
            "{} {} shipping zones have been deleted.",
            ColoredOutput::success("✓"),
            zones.len()
        );

        Ok(())
    }
}
