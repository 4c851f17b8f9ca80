//! Task repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::Result;
use crate::models::{Task, TaskDraft, TaskId};
use crate::util::iso_timestamp_now;
use libsql::{params, Connection, Row};

/// Trait for task storage operations (async)
#[allow(async_fn_in_trait)]
pub trait TaskRepository {
    async fn create(&self, draft: &TaskDraft) -> Result<TaskId>;
    async fn list_all(&self) -> Result<Vec<Task>>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Task>>;
    async fn get(&self, id: &TaskId) -> Result<Option<Task>>;
    /// Overwrite title, description and owner; `date_created` is kept
    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<()>;
    async fn delete(&self, id: &TaskId) -> Result<()>;
    async fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// libSQL implementation of `TaskRepository`
pub struct LibSqlTaskRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlTaskRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_task(row: &Row) -> Result<Option<Task>> {
        let raw_id: String = row.get(0)?;
        let id = match raw_id.parse::<TaskId>() {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!("Skipping task with malformed id {:?}: {}", raw_id, error);
                return Ok(None);
            }
        };
        Ok(Some(Task {
            id,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            date_created: row.get(4)?,
        }))
    }

    async fn collect(&self, mut rows: libsql::Rows) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            if let Some(task) = Self::parse_task(&row)? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }
}

impl TaskRepository for LibSqlTaskRepository<'_> {
    async fn create(&self, draft: &TaskDraft) -> Result<TaskId> {
        let id = TaskId::new();
        self.conn
            .execute(
                "INSERT INTO tasks (id, user_id, title, description, date_created) VALUES (?, ?, ?, ?, ?)",
                params![
                    id.as_str(),
                    draft.user_id.clone(),
                    draft.title.clone(),
                    draft.description.clone(),
                    iso_timestamp_now()
                ],
            )
            .await?;
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        let rows = self
            .conn
            .query(
                "SELECT id, user_id, title, description, date_created FROM tasks ORDER BY rowid",
                (),
            )
            .await?;
        self.collect(rows).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Task>> {
        let rows = self
            .conn
            .query(
                "SELECT id, user_id, title, description, date_created FROM tasks WHERE user_id = ? ORDER BY rowid",
                params![user_id],
            )
            .await?;
        self.collect(rows).await
    }

    async fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, title, description, date_created FROM tasks WHERE id = ?",
                params![id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::parse_task(&row),
            None => Ok(None),
        }
    }

    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<()> {
        self.conn
            .execute(
                "UPDATE tasks SET user_id = ?, title = ?, description = ? WHERE id = ?",
                params![
                    draft.user_id.clone(),
                    draft.title.clone(),
                    draft.description.clone(),
                    id.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?", params![id.as_str()])
            .await?;
        Ok(())
    }

    async fn list_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id FROM tasks WHERE id LIKE ? ORDER BY date_created DESC LIMIT ?",
                params![format!("{prefix}%"), limit as i64],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            let id = row.get::<String>(0)?;
            if id.parse::<TaskId>().is_ok() {
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

    #[tokio::test(flavor = "multi_thread")]
    async fn test_task_crud() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlTaskRepository::new(db.connection());

        let id = repo
            .create(&TaskDraft::new("Water plants", "balcony"))
            .await
            .unwrap();
        let task = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(task.title, "Water plants");

        repo.update(&id, &TaskDraft::new("Water all plants", "balcony"))
            .await
            .unwrap();
        let updated = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Water all plants");
        assert_eq!(updated.date_created, task.date_created);

        repo.delete(&id).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rows_with_malformed_id_are_skipped() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlTaskRepository::new(db.connection());

        db.connection()
            .execute(
                "INSERT INTO tasks (id, title, date_created) VALUES ('task-7', 'Imported', '2024-01-01T00:00:00Z')",
                (),
            )
            .await
            .unwrap();

        assert!(repo.list_all().await.unwrap().is_empty());
        assert!(repo.list_ids_by_prefix("task", 3).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_by_user_filters_owner() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlTaskRepository::new(db.connection());

        repo.create(&TaskDraft::new("Mine", "").owned_by(Some("u1".into())))
            .await
            .unwrap();
        repo.create(&TaskDraft::new("Theirs", "").owned_by(Some("u2".into())))
            .await
            .unwrap();
        repo.create(&TaskDraft::new("Nobody's", "")).await.unwrap();

        let mine = repo.list_by_user("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Mine");
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }
}
