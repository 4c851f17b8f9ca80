//! Journal export as JSON or Markdown.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::home::sort_by_recency;
use crate::models::{Journal, Mood};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// What goes into an export besides the text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Embed base64 photos and voice notes (JSON only)
    pub include_media: bool,
}

/// One exported entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJournal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date_created: String,
    pub date_modified: String,
    pub mood: Option<Mood>,
    pub has_photo: bool,
    pub has_voice_note: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_note_base64: Option<String>,
}

#[must_use]
pub fn journal_to_export_item(journal: &Journal, options: ExportOptions) -> ExportJournal {
    ExportJournal {
        id: journal.id.to_string(),
        title: journal.title.clone(),
        description: journal.description.clone(),
        date_created: journal.date_created.clone(),
        date_modified: journal.date_modified.clone(),
        mood: journal.mood,
        has_photo: journal.photo.is_some(),
        has_voice_note: journal.voice_note.is_some(),
        photo_base64: journal.photo.clone().filter(|_| options.include_media),
        voice_note_base64: journal.voice_note.clone().filter(|_| options.include_media),
    }
}

fn newest_first(journals: &[Journal]) -> Vec<Journal> {
    let mut sorted = journals.to_vec();
    sort_by_recency(&mut sorted);
    sorted
}

/// Render entries, newest first, as pretty-printed JSON.
pub fn render_json_export(journals: &[Journal], options: ExportOptions) -> serde_json::Result<String> {
    let items = newest_first(journals)
        .iter()
        .map(|journal| journal_to_export_item(journal, options))
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&items)
}

/// Render entries, newest first, as Markdown with a frontmatter block each.
/// Media is never embedded; the frontmatter only flags its presence.
#[must_use]
pub fn render_markdown_export(journals: &[Journal]) -> String {
    let mut output = String::new();

    for (index, journal) in newest_first(journals).iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", journal.id);
        let _ = writeln!(output, "date_created: {}", journal.date_created);
        let _ = writeln!(output, "date_modified: {}", journal.date_modified);
        if let Some(mood) = journal.mood {
            let _ = writeln!(output, "mood: {mood}");
        }
        if journal.photo.is_some() {
            let _ = writeln!(output, "photo: true");
        }
        if journal.voice_note.is_some() {
            let _ = writeln!(output, "voice_note: true");
        }
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "# {}", journal.title);
        if !journal.description.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "{}", journal.description);
        }
    }

    output
}

pub fn render_journals_export(
    journals: &[Journal],
    format: ExportFormat,
    options: ExportOptions,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(journals, options),
        ExportFormat::Markdown => Ok(render_markdown_export(journals)),
    }
}

#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("diarydrift-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JournalId;
    use pretty_assertions::assert_eq;

    fn journal(title: &str, created: &str) -> Journal {
        Journal {
            id: "cccccccc-cccc-7ccc-8ccc-111111111111".parse::<JournalId>().unwrap(),
            title: title.to_string(),
            description: "Long walk by the river".to_string(),
            date_created: created.to_string(),
            date_modified: created.to_string(),
            mood: Some(Mood::Relaxed),
            photo: Some("/9j/4AAQ".to_string()),
            voice_note: None,
        }
    }

    #[test]
    fn markdown_has_frontmatter_and_body() {
        let rendered = render_markdown_export(&[journal("Sunday", "2025-03-02T09:00:00.000Z")]);

        assert!(rendered.starts_with("---\nid: cccccccc-cccc-7ccc-8ccc-111111111111\n"));
        assert!(rendered.contains("mood: relaxed\n"));
        assert!(rendered.contains("photo: true\n"));
        assert!(!rendered.contains("voice_note"));
        assert!(rendered.contains("# Sunday\n\nLong walk by the river\n"));
        assert!(!rendered.contains("/9j/4AAQ"));
    }

    #[test]
    fn json_omits_media_unless_requested() {
        let journals = [journal("Sunday", "2025-03-02T09:00:00.000Z")];

        let without: Vec<ExportJournal> =
            serde_json::from_str(&render_json_export(&journals, ExportOptions::default()).unwrap())
                .unwrap();
        assert!(without[0].has_photo);
        assert_eq!(without[0].photo_base64, None);

        let with: Vec<ExportJournal> = serde_json::from_str(
            &render_json_export(&journals, ExportOptions { include_media: true }).unwrap(),
        )
        .unwrap();
        assert_eq!(with[0].photo_base64.as_deref(), Some("/9j/4AAQ"));
    }

    #[test]
    fn exports_are_newest_first() {
        let rendered = render_markdown_export(&[
            journal("Older", "2025-01-01T00:00:00.000Z"),
            journal("Newer", "2025-02-01T00:00:00.000Z"),
        ]);
        let newer = rendered.find("# Newer").unwrap();
        let older = rendered.find("# Older").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "diarydrift-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "diarydrift-export-456.md"
        );
    }
}
