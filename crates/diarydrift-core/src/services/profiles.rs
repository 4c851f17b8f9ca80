//! User profile operations over the `users` collection.

use crate::auth::AuthUser;
use crate::db::{LibSqlUserRepository, UserRepository};
use crate::models::{UserProfile, UserProfilePatch};
use crate::util::iso_timestamp_now;
use crate::Result;

use super::DatabaseService;

fn log_failure<T>(action: &str, uid: &str, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        tracing::error!("Failed to {} for user {}: {}", action, uid, error);
    }
    result
}

impl DatabaseService {
    /// Return the profile for `user`, creating it when it does not exist yet.
    pub async fn create_user_profile(&self, user: &AuthUser) -> Result<UserProfile> {
        let result = self.get_or_create_profile(user).await;
        log_failure("create profile", &user.id, result)
    }

    async fn get_or_create_profile(&self, user: &AuthUser) -> Result<UserProfile> {
        let db = self.db.lock().await;
        let repo = LibSqlUserRepository::new(db.connection());
        if let Some(existing) = repo.get(&user.id).await? {
            return Ok(existing);
        }

        let profile = UserProfile::new(
            user.id.clone(),
            user.email.clone().unwrap_or_default(),
            iso_timestamp_now(),
        );
        repo.put(&profile).await?;
        tracing::info!("Created profile for user {}", user.id);
        Ok(profile)
    }

    /// Fetch a profile. A missing profile is created on the fly only when
    /// `current` is the same user.
    pub async fn get_user_profile(
        &self,
        uid: &str,
        current: Option<&AuthUser>,
    ) -> Result<Option<UserProfile>> {
        let existing = {
            let db = self.db.lock().await;
            let repo = LibSqlUserRepository::new(db.connection());
            log_failure("load profile", uid, repo.get(uid).await)?
        };

        match (existing, current) {
            (Some(profile), _) => Ok(Some(profile)),
            (None, Some(user)) if user.id == uid => self.create_user_profile(user).await.map(Some),
            (None, _) => Ok(None),
        }
    }

    /// Apply a partial update and stamp `updatedAt`. Returns `None` when there
    /// is no profile and none may be created.
    pub async fn update_user_profile(
        &self,
        uid: &str,
        patch: &UserProfilePatch,
        current: Option<&AuthUser>,
    ) -> Result<Option<UserProfile>> {
        let Some(mut profile) = self.get_user_profile(uid, current).await? else {
            tracing::debug!("No profile to update for user {}", uid);
            return Ok(None);
        };

        profile.apply(patch);
        profile.updated_at = Some(iso_timestamp_now());

        let db = self.db.lock().await;
        let repo = LibSqlUserRepository::new(db.connection());
        log_failure("update profile", uid, repo.put(&profile).await)?;
        Ok(Some(profile))
    }

    pub async fn update_profile_image(
        &self,
        uid: &str,
        image_base64: String,
        current: Option<&AuthUser>,
    ) -> Result<Option<UserProfile>> {
        let patch = UserProfilePatch {
            profile_image: Some(image_base64),
            ..UserProfilePatch::default()
        };
        self.update_user_profile(uid, &patch, current).await
    }

    pub async fn delete_user_profile(&self, uid: &str) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlUserRepository::new(db.connection());
        log_failure("delete profile", uid, repo.delete(uid).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            email: Some(format!("{id}@example.com")),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_user_profile_is_idempotent() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let ada = user("ada");

        let first = service.create_user_profile(&ada).await.unwrap();
        let second = service.create_user_profile(&ada).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.email, "ada@example.com");
        assert_eq!(first.following, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn get_creates_only_for_the_same_user() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let ada = user("ada");

        assert!(service
            .get_user_profile("ada", Some(&user("bob")))
            .await
            .unwrap()
            .is_none());
        assert!(service.get_user_profile("ada", None).await.unwrap().is_none());

        let created = service.get_user_profile("ada", Some(&ada)).await.unwrap();
        assert!(created.is_some());
        assert!(service.get_user_profile("ada", None).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_creates_missing_profile_then_patches() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let ada = user("ada");
        let patch = UserProfilePatch {
            full_name: Some("Ada Lovelace".to_string()),
            ..UserProfilePatch::default()
        };

        let updated = service
            .update_user_profile("ada", &patch, Some(&ada))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_for_someone_else_is_a_noop() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        let result = service
            .update_profile_image("ada", "aGk=".to_string(), Some(&user("bob")))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(service.get_user_profile("ada", None).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_user_profile_removes_document() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let ada = user("ada");
        service.create_user_profile(&ada).await.unwrap();

        service.delete_user_profile("ada").await.unwrap();
        assert!(service.get_user_profile("ada", None).await.unwrap().is_none());
    }
}
