//! Journal repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::Result;
use crate::models::{Journal, JournalDraft, JournalId, Mood};
use crate::util::iso_timestamp_now;
use libsql::{params, Connection, Row};

const JOURNAL_COLUMNS: &str = "id, title, description, date_created, date_modified, mood, photo_base64, voice_note_base64";

/// Trait for journal storage operations (async)
#[allow(async_fn_in_trait)]
pub trait JournalRepository {
    /// Insert a new entry, stamping both timestamps with the current time
    async fn create(&self, draft: &JournalDraft) -> Result<JournalId>;

    /// Insert a fully-formed entry as-is (imports, fixtures)
    async fn create_with_journal(&self, journal: &Journal) -> Result<()>;

    /// Fetch the whole collection in storage order
    async fn list_all(&self) -> Result<Vec<Journal>>;

    /// Fetch an entry by ID; `None` when it does not exist
    async fn get(&self, id: &JournalId) -> Result<Option<Journal>>;

    /// Overwrite every mutable field and refresh `date_modified`
    async fn update(&self, id: &JournalId, draft: &JournalDraft) -> Result<()>;

    /// Hard delete
    async fn delete(&self, id: &JournalId) -> Result<()>;

    /// IDs starting with `prefix`, newest first
    async fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// libSQL implementation of `JournalRepository`
pub struct LibSqlJournalRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlJournalRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a journal from a database row; `None` for rows whose ID is not
    /// a UUID, since they could never be addressed again
    fn parse_journal(row: &Row) -> Result<Option<Journal>> {
        let raw_id: String = row.get(0)?;
        let id = match raw_id.parse::<JournalId>() {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!("Skipping journal with malformed id {:?}: {}", raw_id, error);
                return Ok(None);
            }
        };
        let mood_label: Option<String> = row.get(5)?;
        let mood = Mood::parse_optional(mood_label.as_deref()).unwrap_or_else(|error| {
            tracing::warn!("Ignoring mood on journal {}: {}", id, error);
            None
        });

        Ok(Some(Journal {
            id,
            title: row.get(1)?,
            description: row.get(2)?,
            date_created: row.get(3)?,
            date_modified: row.get(4)?,
            mood,
            photo: row.get(6)?,
            voice_note: row.get(7)?,
        }))
    }
}

impl JournalRepository for LibSqlJournalRepository<'_> {
    async fn create(&self, draft: &JournalDraft) -> Result<JournalId> {
        let now = iso_timestamp_now();
        let journal = Journal {
            id: JournalId::new(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            date_created: now.clone(),
            date_modified: now,
            mood: draft.mood,
            photo: draft.photo.clone(),
            voice_note: draft.voice_note.clone(),
        };

        self.create_with_journal(&journal).await?;
        Ok(journal.id)
    }

    async fn create_with_journal(&self, journal: &Journal) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO journals (id, title, description, date_created, date_modified, mood, photo_base64, voice_note_base64)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    journal.id.as_str(),
                    journal.title.clone(),
                    journal.description.clone(),
                    journal.date_created.clone(),
                    journal.date_modified.clone(),
                    journal.mood.map(|mood| mood.as_str().to_string()),
                    journal.photo.clone(),
                    journal.voice_note.clone()
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Journal>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {JOURNAL_COLUMNS} FROM journals ORDER BY rowid"),
                (),
            )
            .await?;

        let mut journals = Vec::new();
        while let Some(row) = rows.next().await? {
            if let Some(journal) = Self::parse_journal(&row)? {
                journals.push(journal);
            }
        }
        Ok(journals)
    }

    async fn get(&self, id: &JournalId) -> Result<Option<Journal>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {JOURNAL_COLUMNS} FROM journals WHERE id = ?"),
                params![id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::parse_journal(&row),
            None => Ok(None),
        }
    }

    async fn update(&self, id: &JournalId, draft: &JournalDraft) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE journals
                 SET title = ?, description = ?, mood = ?, photo_base64 = ?, voice_note_base64 = ?, date_modified = ?
                 WHERE id = ?",
                params![
                    draft.title.clone(),
                    draft.description.clone(),
                    draft.mood.map(|mood| mood.as_str().to_string()),
                    draft.photo.clone(),
                    draft.voice_note.clone(),
                    iso_timestamp_now(),
                    id.as_str()
                ],
            )
            .await?;

        if rows == 0 {
            tracing::debug!("Update matched no journal for id {}", id);
        }
        Ok(())
    }

    async fn delete(&self, id: &JournalId) -> Result<()> {
        self.conn
            .execute("DELETE FROM journals WHERE id = ?", params![id.as_str()])
            .await?;
        Ok(())
    }

    async fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id FROM journals WHERE id LIKE ? ORDER BY date_created DESC LIMIT ?",
                params![format!("{prefix}%"), limit as i64],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            let id = row.get::<String>(0)?;
            if id.parse::<JournalId>().is_ok() {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let draft = JournalDraft::new("First day", "Hello").with_mood(Some(Mood::Happy));
        let id = repo.create(&draft).await.unwrap();

        let fetched = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "First day");
        assert_eq!(fetched.mood, Some(Mood::Happy));
        assert_eq!(fetched.date_created, fetched.date_modified);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_missing_returns_none() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        assert!(repo.get(&JournalId::new()).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_keeps_date_created() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let id = repo
            .create(&JournalDraft::new("Draft", "before"))
            .await
            .unwrap();
        let before = repo.get(&id).await.unwrap().unwrap();

        sleep(Duration::from_millis(5)).await;
        let edited = JournalDraft::new("Final", "after").with_mood(Some(Mood::Relaxed));
        repo.update(&id, &edited).await.unwrap();

        let after = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(after.title, "Final");
        assert_eq!(after.mood, Some(Mood::Relaxed));
        assert_eq!(after.date_created, before.date_created);
        assert_ne!(after.date_modified, before.date_modified);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_clears_removed_media() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let draft = JournalDraft::new("Snap", "").with_photo(Some("aGVsbG8=".to_string()));
        let id = repo.create(&draft).await.unwrap();

        repo.update(&id, &JournalDraft::new("Snap", "")).await.unwrap();
        assert!(repo.get(&id).await.unwrap().unwrap().photo.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_is_hard_and_idempotent() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let id = repo.create(&JournalDraft::new("Gone", "")).await.unwrap();
        repo.delete(&id).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());

        // Deleting again is indistinguishable from success
        repo.delete(&id).await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_mood_reads_as_unset() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let id = repo.create(&JournalDraft::new("Odd", "")).await.unwrap();
        db.connection()
            .execute(
                "UPDATE journals SET mood = 'melancholy' WHERE id = ?",
                params![id.as_str()],
            )
            .await
            .unwrap();

        assert_eq!(repo.get(&id).await.unwrap().unwrap().mood, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rows_with_malformed_id_are_skipped() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let id = repo.create(&JournalDraft::new("Kept", "")).await.unwrap();
        db.connection()
            .execute(
                "INSERT INTO journals (id, title, description, date_created, date_modified)
                 VALUES ('legacy-42', 'Imported', '', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
                (),
            )
            .await
            .unwrap();

        let journals = repo.list_all().await.unwrap();
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].id, id);
        assert!(repo.list_ids_by_prefix("legacy", 3).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_ids_by_prefix() {
        let db = setup().await;
        let repo = LibSqlJournalRepository::new(db.connection());

        let id = repo.create(&JournalDraft::new("One", "")).await.unwrap();
        let prefix: String = id.as_str().chars().take(20).collect();

        let ids = repo.list_ids_by_prefix(&prefix, 3).await.unwrap();
        assert_eq!(ids, vec![id.as_str()]);
    }
}
