//! User profile model

use serde::{Deserialize, Serialize};

/// Per-user profile document, keyed by the auth user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Inline base64 avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub following: i64,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserProfile {
    /// Fresh profile for a newly seen user
    #[must_use]
    pub fn new(uid: impl Into<String>, email: impl Into<String>, created_at: String) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
            profile_image: None,
            phone_number: None,
            full_name: None,
            following: 0,
            created_at,
            updated_at: None,
        }
    }

    /// Apply the set fields of a patch.
    pub fn apply(&mut self, patch: &UserProfilePatch) {
        if let Some(value) = &patch.display_name {
            self.display_name = Some(value.clone());
        }
        if let Some(value) = &patch.profile_image {
            self.profile_image = Some(value.clone());
        }
        if let Some(value) = &patch.phone_number {
            self.phone_number = Some(value.clone());
        }
        if let Some(value) = &patch.full_name {
            self.full_name = Some(value.clone());
        }
        if let Some(value) = patch.following {
            self.following = value;
        }
    }
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfilePatch {
    pub display_name: Option<String>,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub following: Option<i64>,
}

impl UserProfilePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.profile_image.is_none()
            && self.phone_number.is_none()
            && self.full_name.is_none()
            && self.following.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new("u1", "a@example.com", "2025-01-01T00:00:00.000Z".into());
        assert_eq!(profile.following, 0);
        assert!(profile.updated_at.is_none());
    }

    #[test]
    fn test_apply_patch_only_touches_set_fields() {
        let mut profile =
            UserProfile::new("u1", "a@example.com", "2025-01-01T00:00:00.000Z".into());
        profile.full_name = Some("Ada".to_string());

        profile.apply(&UserProfilePatch {
            display_name: Some("ada".to_string()),
            ..UserProfilePatch::default()
        });

        assert_eq!(profile.display_name.as_deref(), Some("ada"));
        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(UserProfilePatch::default().is_empty());
    }
}
