//! Shared database service wrapper used by every command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{
    Database, JournalRepository, LibSqlJournalRepository, LibSqlTaskRepository, SyncConfig,
    TaskRepository,
};
use crate::models::{Journal, JournalDraft, JournalId, Task, TaskDraft, TaskId};
use crate::Result;

/// Thread-safe handle over the journal, task and user collections.
#[derive(Clone)]
pub struct DatabaseService {
    pub(crate) db: Arc<Mutex<Database>>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(
        db_path: impl Into<PathBuf>,
        sync_config: Option<SyncConfig>,
    ) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = match sync_config {
            Some(config) => Self::open_with_replica_recovery(&db_path, config).await?,
            None => {
                tracing::info!("Running in local-only mode (no sync config)");
                Database::open(&db_path).await?
            }
        };
        Ok(Self::from_database(db))
    }

    /// Open a local-only database service at the given path.
    pub async fn open_local_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_path(db_path, None).await
    }

    /// Open a sync-enabled database service at the given path.
    pub async fn open_sync_path(
        db_path: impl Into<PathBuf>,
        sync_config: SyncConfig,
    ) -> Result<Self> {
        Self::open_path(db_path, Some(sync_config)).await
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self::from_database(db))
    }

    fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn open_with_replica_recovery(db_path: &Path, sync_config: SyncConfig) -> Result<Database> {
        tracing::info!(
            "Sync enabled with remote store: {}",
            sync_config.url.as_deref().unwrap_or("unknown")
        );
        match Database::open_with_sync(db_path, sync_config.clone()).await {
            Ok(db) => Ok(db),
            Err(error) if is_recoverable_replica_error(&error) => {
                tracing::warn!(
                    "Local replica at {} is inconsistent ({}); resetting it and retrying once",
                    db_path.display(),
                    error
                );
                quarantine_replica_files(db_path)?;
                Database::open_with_sync(db_path, sync_config).await
            }
            Err(error) => Err(error),
        }
    }

    /// Sync with the remote store when sync is enabled.
    pub async fn sync(&self) -> Result<()> {
        let db = self.db.lock().await;
        db.sync().await
    }

    /// Whether this service talks to a remote replica.
    pub async fn is_sync_enabled(&self) -> bool {
        let db = self.db.lock().await;
        db.is_sync_enabled()
    }

    /// Create a journal entry and return its generated id.
    pub async fn create_journal(&self, draft: &JournalDraft) -> Result<JournalId> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.create(draft).await
    }

    /// Insert an entry with a pre-assigned id and timestamps.
    pub async fn create_journal_with_id(&self, journal: &Journal) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.create_with_journal(journal).await
    }

    /// Fetch the whole `journals` collection.
    pub async fn list_journals(&self) -> Result<Vec<Journal>> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.list_all().await
    }

    /// Fetch a journal entry; `None` when the id does not resolve.
    pub async fn get_journal(&self, id: &JournalId) -> Result<Option<Journal>> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.get(id).await
    }

    pub async fn update_journal(&self, id: &JournalId, draft: &JournalDraft) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.update(id, draft).await
    }

    pub async fn delete_journal(&self, id: &JournalId) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.delete(id).await
    }

    /// Journal ids starting with `prefix`, newest first.
    pub async fn list_journal_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let repo = LibSqlJournalRepository::new(db.connection());
        repo.list_ids_by_prefix(prefix, limit).await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<TaskId> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.create(draft).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.list_all().await
    }

    pub async fn list_tasks_by_user(&self, user_id: &str) -> Result<Vec<Task>> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.list_by_user(user_id).await
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.get(id).await
    }

    pub async fn update_task(&self, id: &TaskId, draft: &TaskDraft) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.update(id, draft).await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.delete(id).await
    }

    pub async fn list_task_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let repo = LibSqlTaskRepository::new(db.connection());
        repo.list_ids_by_prefix(prefix, limit).await
    }
}

fn is_recoverable_replica_error(error: &crate::Error) -> bool {
    let message = error.to_string().to_ascii_lowercase();
    message.contains("file is not a database")
        || message.contains("invalid local state")
        || message.contains("metadata file exists but db file does not")
}

/// Move a broken replica aside and drop its sidecar files (`<name>-info`, `<name>-wal`, ...).
fn quarantine_replica_files(db_path: &Path) -> Result<()> {
    let Some(base_name) = db_path.file_name().and_then(|name| name.to_str()) else {
        return Ok(());
    };

    if db_path.exists() {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let backup_path = db_path.with_file_name(format!("{base_name}.corrupt-{timestamp}"));
        std::fs::rename(db_path, &backup_path)?;
        tracing::warn!(
            "Moved broken replica {} to {}",
            db_path.display(),
            backup_path.display()
        );
    }

    let Some(parent) = db_path.parent() else {
        return Ok(());
    };
    let sidecar_prefix = format!("{base_name}-");
    for entry in std::fs::read_dir(parent)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(&sidecar_prefix)
        {
            let path = entry.path();
            std::fs::remove_file(&path)?;
            tracing::warn!("Removed stale replica file {}", path.display());
        }
    }

    Ok(())
}
