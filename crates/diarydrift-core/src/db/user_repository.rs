//! User profile repository implementation

use crate::error::Result;
use crate::models::UserProfile;
use libsql::{params, Connection, Row};

/// Trait for user profile storage (async)
#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>>;
    /// Insert or replace the whole document
    async fn put(&self, profile: &UserProfile) -> Result<()>;
    async fn delete(&self, uid: &str) -> Result<()>;
}

/// libSQL implementation of `UserRepository`
pub struct LibSqlUserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlUserRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_profile(row: &Row) -> Result<UserProfile> {
        Ok(UserProfile {
            uid: row.get(0)?,
            email: row.get(1)?,
            display_name: row.get(2)?,
            profile_image: row.get(3)?,
            phone_number: row.get(4)?,
            full_name: row.get(5)?,
            following: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl UserRepository for LibSqlUserRepository<'_> {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
        let mut rows = self
            .conn
            .query(
                "SELECT uid, email, display_name, profile_image, phone_number, full_name, following, created_at, updated_at
                 FROM users WHERE uid = ?",
                params![uid],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, profile: &UserProfile) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO users (uid, email, display_name, profile_image, phone_number, full_name, following, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    profile.uid.clone(),
                    profile.email.clone(),
                    profile.display_name.clone(),
                    profile.profile_image.clone(),
                    profile.phone_number.clone(),
                    profile.full_name.clone(),
                    profile.following,
                    profile.created_at.clone(),
                    profile.updated_at.clone()
                ],
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, uid: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM users WHERE uid = ?", params![uid])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_put_get_delete() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlUserRepository::new(db.connection());

        let mut profile = UserProfile::new("uid-1", "me@example.com", "2025-01-01T00:00:00.000Z".into());
        profile.following = 3;
        repo.put(&profile).await.unwrap();

        assert_eq!(repo.get("uid-1").await.unwrap(), Some(profile));

        repo.delete("uid-1").await.unwrap();
        assert!(repo.get("uid-1").await.unwrap().is_none());
    }
}
