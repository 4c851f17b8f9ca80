use std::env;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use diarydrift_core::auth::{AuthGate, Route};
use diarydrift_core::db::SyncConfig;
use diarydrift_core::models::{Task, TaskId};
use diarydrift_core::theme::Theme;
use diarydrift_core::util::normalize_text_option;
use diarydrift_core::{AppContext, DatabaseService, Journal, JournalId};

use crate::auth::{AuthService, AuthSession};
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;
use crate::managed_sync::ManagedSyncAuthClient;

const PREFIX_MATCH_LIMIT: usize = 3;
pub const SHORT_ID_LEN: usize = 13;

/// The resolved CLI profile together with its restored session.
pub struct ActiveProfile {
    pub name: String,
    pub profile: CliProfile,
    pub auth: Option<AuthService>,
    pub session: Option<AuthSession>,
}

impl ActiveProfile {
    pub async fn load(explicit: Option<&str>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let name = config.resolve_profile_name(explicit);
        let profile = config.profile(&name).cloned().unwrap_or_default();
        Self::restore(name, profile).await
    }

    pub async fn restore(name: String, profile: CliProfile) -> Result<Self, CliError> {
        let auth = AuthService::new_for_profile(&name, &profile)
            .map_err(|error| CliError::Auth(error.to_string()))?;
        let session = match auth.as_ref() {
            Some(service) => service
                .restore_session()
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?,
            None => None,
        };

        Ok(Self {
            name,
            profile,
            auth,
            session,
        })
    }

    /// Gate, user and theme for this profile.
    pub fn app_context(&self) -> AppContext {
        let settings = self.profile.settings();
        let mut context = if self.auth.is_some() {
            AppContext::new(
                AuthGate::required(),
                self.session.as_ref().map(|session| session.user.clone()),
                settings,
            )
        } else {
            AppContext::local(settings)
        };
        context.set_theme(output_theme(context.theme(), colors_enabled()));
        context
    }

    pub async fn open_database(&self, path: &Path) -> Result<DatabaseService, CliError> {
        self.open_database_with_mode(path, OpenDatabaseMode::Standard)
            .await
    }

    pub async fn open_sync_database(&self, path: &Path) -> Result<DatabaseService, CliError> {
        self.open_database_with_mode(path, OpenDatabaseMode::RequireSync)
            .await
    }

    async fn open_database_with_mode(
        &self,
        path: &Path,
        mode: OpenDatabaseMode,
    ) -> Result<DatabaseService, CliError> {
        let sync_config = self.sync_config().await?;
        if sync_config.is_none() && mode.requires_sync() {
            return Err(CliError::SyncNotConfigured);
        }
        Ok(DatabaseService::open_path(path.to_path_buf(), sync_config).await?)
    }

    /// Explicit profile credentials, then environment credentials, then the
    /// managed exchange for a signed-in user.
    async fn sync_config(&self) -> Result<Option<SyncConfig>, CliError> {
        if let Some(config) = self.profile.direct_sync_config() {
            tracing::info!("Sync enabled via profile '{}' credentials", self.name);
            return Ok(Some(config));
        }

        let env_url = normalize_text_option(env::var("DIARYDRIFT_DATABASE_URL").ok());
        let env_token = normalize_text_option(env::var("DIARYDRIFT_DATABASE_TOKEN").ok());
        if let (Some(url), Some(token)) = (env_url, env_token) {
            tracing::info!("Sync enabled via environment credentials");
            return Ok(Some(SyncConfig::new(url, token)));
        }

        let (Some(endpoint), Some(session)) =
            (self.profile.managed_sync_endpoint(), self.session.as_ref())
        else {
            return Ok(None);
        };

        let client = ManagedSyncAuthClient::new(endpoint)
            .map_err(|error| CliError::ManagedSync(error.to_string()))?;
        let config = client
            .exchange_sync_config(&session.access_token, self.profile.database_url().as_deref())
            .await
            .map_err(|error| CliError::ManagedSync(error.to_string()))?;

        tracing::info!("Managed sync enabled via profile '{}'", self.name);
        Ok(Some(config))
    }
}

#[derive(Clone, Copy)]
enum OpenDatabaseMode {
    Standard,
    RequireSync,
}

impl OpenDatabaseMode {
    const fn requires_sync(self) -> bool {
        matches!(self, Self::RequireSync)
    }
}

fn colors_enabled() -> bool {
    env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// Drop colour when stdout is piped or `NO_COLOR` is set.
pub const fn output_theme(theme: Theme, colors_enabled: bool) -> Theme {
    if colors_enabled {
        theme
    } else {
        theme.without_color()
    }
}

/// Dashboard commands are only reachable once the gate lets the user through.
pub fn require_dashboard(context: &AppContext, profile_name: &str) -> Result<(), CliError> {
    match context.route() {
        Route::Dashboard => Ok(()),
        Route::Login => Err(CliError::NotSignedIn(profile_name.to_string())),
    }
}

pub fn normalize_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// `Ok(None)` for no match, the id for exactly one, an error listing the
/// candidates otherwise.
fn single_prefix_match(query: &str, matching_ids: &[String]) -> Result<Option<String>, CliError> {
    match matching_ids {
        [] => Ok(None),
        [only] => Ok(Some(only.clone())),
        _ => {
            let options = matching_ids
                .iter()
                .map(|id| short_id(id))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub async fn resolve_journal(query: &str, db: &DatabaseService) -> Result<Journal, CliError> {
    let query = normalize_identifier(query)?;
    if let Ok(journal_id) = query.parse::<JournalId>() {
        if let Some(journal) = db.get_journal(&journal_id).await? {
            return Ok(journal);
        }
    }

    let matching_ids = db
        .list_journal_ids_by_prefix(&query, PREFIX_MATCH_LIMIT)
        .await?;
    let resolved = single_prefix_match(&query, &matching_ids)?
        .and_then(|id| id.parse::<JournalId>().ok())
        .ok_or_else(|| CliError::JournalNotFound(query.clone()))?;

    db.get_journal(&resolved)
        .await?
        .ok_or(CliError::JournalNotFound(query))
}

pub async fn resolve_task(query: &str, db: &DatabaseService) -> Result<Task, CliError> {
    let query = normalize_identifier(query)?;
    if let Ok(task_id) = query.parse::<TaskId>() {
        if let Some(task) = db.get_task(&task_id).await? {
            return Ok(task);
        }
    }

    let matching_ids = db.list_task_ids_by_prefix(&query, PREFIX_MATCH_LIMIT).await?;
    let resolved = single_prefix_match(&query, &matching_ids)?
        .and_then(|id| id.parse::<TaskId>().ok())
        .ok_or_else(|| CliError::TaskNotFound(query.clone()))?;

    db.get_task(&resolved)
        .await?
        .ok_or(CliError::TaskNotFound(query))
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Relative label for an optional timestamp; unparseable dates stay visible.
pub fn relative_time_label(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "unknown date".to_string(),
        |value| format_relative_time(value.timestamp_millis(), Utc::now().timestamp_millis()),
    )
}

pub fn format_timestamp(timestamp: Option<DateTime<Utc>>, raw: &str) -> String {
    timestamp.map_or_else(
        || raw.to_string(),
        |value| value.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_entry_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_entry_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("diarydrift-entry-{}-{now}.md", std::process::id()))
}

/// Ask a `y/N` question on stderr. Anything but `y`/`yes` declines, including
/// an empty or closed stdin.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    confirm_with(&mut io::stdin().lock(), &mut io::stderr(), prompt)
}

pub fn confirm_with(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> Result<bool, CliError> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("DIARYDRIFT_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("diarydrift")
        .join("diarydrift.db")
}
