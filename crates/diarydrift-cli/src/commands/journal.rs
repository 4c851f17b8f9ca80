use std::fmt::Write as _;
use std::path::Path;

use diarydrift_core::media::{
    decode_base64, prepare_photo, prepare_voice_note, wav_duration_ms, PhotoOptions,
};
use diarydrift_core::models::Settings;
use diarydrift_core::theme::Theme;
use diarydrift_core::{AppContext, DatabaseService, Journal, JournalDraft};
use serde::Serialize;

use crate::cli::{JournalCommands, MoodChoice};
use crate::commands::common::{
    capture_editor_input_with_initial, confirm, format_timestamp, preview, read_piped_stdin,
    relative_time_label, resolve_journal, short_id,
};
use crate::error::CliError;

const SAVE_FAILED: &str = "Could not save journal entry.";
const DELETE_FAILED: &str = "Could not delete journal entry.";
const LOAD_FAILED: &str = "Could not load journal entries.";

#[derive(Debug, Serialize)]
pub struct JournalListItem {
    pub id: String,
    pub title: String,
    pub mood: Option<String>,
    pub date_created: String,
    pub date_modified: String,
    pub relative_time: String,
    pub has_photo: bool,
    pub has_voice_note: bool,
}

pub async fn run_journal(
    command: JournalCommands,
    db: &DatabaseService,
    context: &AppContext,
) -> Result<(), CliError> {
    match command {
        JournalCommands::Add {
            title,
            description,
            mood,
            photo,
            voice,
            editor,
        } => {
            let description = match description {
                Some(text) => text,
                None if editor => capture_editor_input_with_initial("")?.unwrap_or_default(),
                None => read_piped_stdin()?.unwrap_or_default(),
            };
            let mut draft = JournalDraft::new(title.trim(), description)
                .with_mood(mood.and_then(MoodChoice::into_mood));
            draft.validate()?;
            attach_media(&mut draft, photo.as_deref(), voice.as_deref(), context.settings())?;

            let id = {
                let _loading = context.begin_loading();
                db.create_journal(&draft)
                    .await
                    .map_err(CliError::backend(SAVE_FAILED))?
            };
            println!("{id}");
            Ok(())
        }
        JournalCommands::List { json } => {
            let journals = list_journals(db, context).await?;
            if json {
                let items = journals
                    .iter()
                    .map(journal_to_list_item)
                    .collect::<Vec<_>>();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if journals.is_empty() {
                println!("No journal entries yet.");
            } else {
                for line in format_journal_lines(&journals, context.theme()) {
                    println!("{line}");
                }
            }
            Ok(())
        }
        JournalCommands::Show {
            id,
            json,
            save_photo,
            save_voice,
        } => {
            let journal = resolve_journal(&id, db).await?;
            if let Some(path) = save_photo.as_deref() {
                save_media(journal.photo.as_deref(), "photo", path)?;
            }
            if let Some(path) = save_voice.as_deref() {
                save_media(journal.voice_note.as_deref(), "voice note", path)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&journal)?);
            } else {
                print!("{}", render_journal_detail(&journal, context.theme()));
            }
            Ok(())
        }
        JournalCommands::Edit {
            id,
            title,
            description,
            mood,
            photo,
            voice,
            remove_photo,
            remove_voice,
            editor,
        } => {
            let journal = resolve_journal(&id, db).await?;
            let untouched = title.is_none()
                && description.is_none()
                && mood.is_none()
                && photo.is_none()
                && voice.is_none()
                && !remove_photo
                && !remove_voice;

            let mut draft = journal.to_draft();
            if let Some(title) = title {
                draft.title = title.trim().to_string();
            }
            if let Some(description) = description {
                draft.description = description;
            } else if editor || untouched {
                draft.description =
                    capture_editor_input_with_initial(&journal.description)?.unwrap_or_default();
            }
            if let Some(mood) = mood {
                draft.mood = mood.into_mood();
            }
            if remove_photo {
                draft.photo = None;
            }
            if remove_voice {
                draft.voice_note = None;
            }
            draft.validate()?;
            attach_media(&mut draft, photo.as_deref(), voice.as_deref(), context.settings())?;

            {
                let _loading = context.begin_loading();
                db.update_journal(&journal.id, &draft)
                    .await
                    .map_err(CliError::backend(SAVE_FAILED))?;
            }
            println!("{}", journal.id);
            Ok(())
        }
        JournalCommands::Delete { id, yes } => {
            let journal = resolve_journal(&id, db).await?;
            if !yes && !confirm(&format!("Delete \"{}\"?", journal.title))? {
                println!("Cancelled.");
                return Ok(());
            }

            {
                let _loading = context.begin_loading();
                db.delete_journal(&journal.id)
                    .await
                    .map_err(CliError::backend(DELETE_FAILED))?;
            }
            println!("Deleted {}", journal.id);
            Ok(())
        }
    }
}

async fn list_journals(db: &DatabaseService, context: &AppContext) -> Result<Vec<Journal>, CliError> {
    let _loading = context.begin_loading();
    let mut journals = db
        .list_journals()
        .await
        .map_err(CliError::backend(LOAD_FAILED))?;
    diarydrift_core::home::sort_by_recency(&mut journals);
    Ok(journals)
}

/// Replace the photo and/or voice note on `draft` with prepared file contents.
pub fn attach_media(
    draft: &mut JournalDraft,
    photo_path: Option<&Path>,
    voice_path: Option<&Path>,
    settings: &Settings,
) -> Result<(), CliError> {
    if let Some(path) = photo_path {
        let options = PhotoOptions {
            max_encoded_bytes: settings.max_media_bytes,
            ..PhotoOptions::default()
        };
        let prepared = prepare_photo(&std::fs::read(path)?, options)?;
        tracing::debug!(
            "Prepared {}x{} photo from {}",
            prepared.width,
            prepared.height,
            path.display()
        );
        draft.photo = Some(prepared.base64);
    }

    if let Some(path) = voice_path {
        let prepared = prepare_voice_note(&std::fs::read(path)?, settings.max_media_bytes)?;
        draft.voice_note = Some(prepared.base64);
    }

    Ok(())
}

fn save_media(encoded: Option<&str>, label: &'static str, path: &Path) -> Result<(), CliError> {
    let encoded = encoded.ok_or(CliError::MissingMedia(label))?;
    std::fs::write(path, decode_base64(encoded)?)?;
    println!("Saved {label} to {}", path.display());
    Ok(())
}

pub fn journal_to_list_item(journal: &Journal) -> JournalListItem {
    JournalListItem {
        id: journal.id.to_string(),
        title: journal.title.clone(),
        mood: journal.mood.map(|mood| mood.to_string()),
        date_created: journal.date_created.clone(),
        date_modified: journal.date_modified.clone(),
        relative_time: relative_time_label(journal.created_at()),
        has_photo: journal.photo.is_some(),
        has_voice_note: journal.voice_note.is_some(),
    }
}

pub fn format_journal_lines(journals: &[Journal], theme: Theme) -> Vec<String> {
    journals
        .iter()
        .map(|journal| {
            let mut attachments = String::new();
            if journal.photo.is_some() {
                attachments.push_str(" [photo]");
            }
            if journal.voice_note.is_some() {
                attachments.push_str(" [voice]");
            }
            format!(
                "{:<13}  {:<40}  {:<10}  {}{attachments}",
                short_id(&journal.id.as_str()),
                preview(&journal.title, 40),
                relative_time_label(journal.created_at()),
                theme.mood_label(journal.mood)
            )
        })
        .collect()
}

pub fn render_journal_detail(journal: &Journal, theme: Theme) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", journal.title);
    let _ = writeln!(output, "id:       {}", journal.id);
    let _ = writeln!(
        output,
        "created:  {}",
        format_timestamp(journal.created_at(), &journal.date_created)
    );
    let _ = writeln!(
        output,
        "modified: {}",
        format_timestamp(journal.modified_at(), &journal.date_modified)
    );
    let _ = writeln!(output, "mood:     {}", theme.mood_label(journal.mood));
    if journal.photo.is_some() {
        let _ = writeln!(output, "photo:    attached");
    }
    if let Some(voice_note) = journal.voice_note.as_deref() {
        let duration = decode_base64(voice_note)
            .ok()
            .and_then(|bytes| wav_duration_ms(&bytes));
        match duration {
            Some(ms) => {
                let _ = writeln!(output, "voice:    attached ({}.{}s)", ms / 1000, ms % 1000 / 100);
            }
            None => {
                let _ = writeln!(output, "voice:    attached");
            }
        }
    }
    if !journal.description.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", journal.description);
    }
    output
}
