use diarydrift_core::DatabaseService;

use crate::error::CliError;

pub async fn run_sync(db: &DatabaseService) -> Result<(), CliError> {
    if !db.is_sync_enabled().await {
        return Err(CliError::SyncNotConfigured);
    }

    db.sync().await?;
    println!("Sync completed");
    Ok(())
}
