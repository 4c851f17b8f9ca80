use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] diarydrift_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    /// Backend failure shown with a fixed message; the cause goes to the log
    #[error("{message}")]
    Backend {
        message: &'static str,
        #[source]
        source: diarydrift_core::Error,
    },
    #[error("ID cannot be empty")]
    EmptyId,
    #[error("Journal entry not found for id/prefix: {0}")]
    JournalNotFound(String),
    #[error("Task not found for id/prefix: {0}")]
    TaskNotFound(String),
    #[error("{0}")]
    AmbiguousId(String),
    #[error("This entry has no {0} attached")]
    MissingMedia(&'static str),
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Profile '{0}' is not signed in. Run `diarydrift auth login` first.")]
    NotSignedIn(String),
    #[error(
        "This command needs an account. Configure auth with `diarydrift config init` and run `diarydrift auth login`."
    )]
    AccountRequired,
    #[error("Managed sync error: {0}")]
    ManagedSync(String),
    #[error(
        "Sync is not configured. Run `diarydrift config init` + `diarydrift auth login`, or set DIARYDRIFT_DATABASE_URL and DIARYDRIFT_DATABASE_TOKEN."
    )]
    SyncNotConfigured,
}

impl CliError {
    /// Wrap a backend failure behind a generic message, logging the cause.
    pub fn backend(message: &'static str) -> impl FnOnce(diarydrift_core::Error) -> Self {
        move |source| {
            tracing::error!("{}: {}", message, source);
            Self::Backend { message, source }
        }
    }
}
