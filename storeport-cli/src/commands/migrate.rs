//! Database initialization command

use crate::{error::CliResult, utils::ColoredOutput};
use storeport_store::SqlStore;
use tracing::info;

pub struct MigrateCommand;

impl MigrateCommand {
    pub async fn run(db_path: &str) -> CliResult<()> {
        info!("Running migrations on: {}", db_path);

        let store = SqlStore::new(db_path).await?;
        store.migrate().await?;

        println!("{}", ColoredOutput::success("✓ Database ready"));
        println!("Database: {}", ColoredOutput::highlight(db_path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_migrate_creates_the_database() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("fresh.db");

        MigrateCommand::run(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());

        // Running again is a no-op
        MigrateCommand::run(db_path.to_str().unwrap()).await.unwrap();
    }
}
