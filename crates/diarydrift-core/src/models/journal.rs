//! Journal entry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::mood::Mood;
use crate::error::{Error, Result};
use crate::util::parse_iso_timestamp;

/// A unique identifier for a journal entry, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalId(Uuid);

impl JournalId {
    /// Create a new unique journal ID using UUID v7
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

impl Default for JournalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JournalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored diary entry.
///
/// Timestamps are kept exactly as the store returned them; use
/// [`Journal::created_at`] for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    /// Identifier assigned on create
    pub id: JournalId,
    pub title: String,
    pub description: String,
    /// ISO-8601 creation time, set once by the client
    pub date_created: String,
    /// ISO-8601 time of the last write
    pub date_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Inline base64 photo (JPEG)
    #[serde(default, rename = "photoBase64", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Inline base64 voice recording
    #[serde(
        default,
        rename = "voiceNoteBase64",
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_note: Option<String>,
}

impl Journal {
    /// Parsed creation time, `None` when missing or malformed.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_iso_timestamp(&self.date_created)
    }

    /// Parsed modification time, `None` when missing or malformed.
    #[must_use]
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        parse_iso_timestamp(&self.date_modified)
    }

    /// The mutable part of this entry, used to pre-populate the edit form.
    #[must_use]
    pub fn to_draft(&self) -> JournalDraft {
        JournalDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            mood: self.mood,
            photo: self.photo.clone(),
            voice_note: self.voice_note.clone(),
        }
    }
}

/// Form payload for creating or overwriting an entry.
///
/// Everything except the identifier and the timestamps, which the service
/// assigns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    pub title: String,
    pub description: String,
    pub mood: Option<Mood>,
    pub photo: Option<String>,
    pub voice_note: Option<String>,
}

impl JournalDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_mood(mut self, mood: Option<Mood>) -> Self {
        self.mood = mood;
        self
    }

    #[must_use]
    pub fn with_photo(mut self, photo: Option<String>) -> Self {
        self.photo = photo;
        self
    }

    #[must_use]
    pub fn with_voice_note(mut self, voice_note: Option<String>) -> Self {
        self.voice_note = voice_note;
        self
    }

    /// A title is required; whitespace-only counts as missing.
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

    fn sample() -> Journal {
        Journal {
            id: JournalId::new(),
            title: "Morning".to_string(),
            description: "Coffee by the window".to_string(),
            date_created: "2025-03-01T08:15:30.120Z".to_string(),
            date_modified: "2025-03-01T09:00:00.000Z".to_string(),
            mood: Some(Mood::Relaxed),
            photo: None,
            voice_note: Some("UklGRg==".to_string()),
        }
    }

    #[test]
    fn test_journal_id_unique() {
        assert_ne!(JournalId::new(), JournalId::new());
    }

    #[test]
    fn test_journal_id_parse() {
        let id = JournalId::new();
        let parsed: JournalId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_created_at_parses_iso() {
        let journal = sample();
        assert!(journal.created_at().is_some());
        assert!(journal.modified_at() > journal.created_at());
    }

    #[test]
    fn test_created_at_tolerates_bad_dates() {
        let mut journal = sample();
        journal.date_created = "not a date".to_string();
        assert!(journal.created_at().is_none());
    }

    #[test]
    fn test_serializes_with_document_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["dateCreated"], "2025-03-01T08:15:30.120Z");
        assert_eq!(json["mood"], "relaxed");
        assert_eq!(json["voiceNoteBase64"], "UklGRg==");
        assert!(json.get("photoBase64").is_none());
    }

    #[test]
    fn test_draft_requires_title() {
        assert!(JournalDraft::new("   ", "body").validate().is_err());
        assert!(JournalDraft::new("Title", "").validate().is_ok());
    }

    #[test]
    fn test_to_draft_keeps_mutable_fields() {
        let journal = sample();
        let draft = journal.to_draft();
        assert_eq!(draft.title, journal.title);
        assert_eq!(draft.mood, Some(Mood::Relaxed));
        assert_eq!(draft.voice_note, journal.voice_note);
    }
}
