//! Task model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A unique identifier for a task, using UUID v7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Create a new unique task ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A to-do item, optionally owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub title: String,
    pub description: String,
    /// ISO-8601 creation time
    pub date_created: String,
}

/// Writable task fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub user_id: Option<String>,
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            user_id: None,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn owned_by(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Title is required.".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_draft_validation() {
        assert!(TaskDraft::new("", "x").validate().is_err());
        assert!(TaskDraft::new("Buy film", "").validate().is_ok());
    }

    #[test]
    fn test_task_serializes_user_id_camel_case() {
        let task = Task {
            id: TaskId::new(),
            user_id: Some("user-1".to_string()),
            title: "Stretch".to_string(),
            description: String::new(),
            date_created: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["userId"], "user-1");
    }
}
