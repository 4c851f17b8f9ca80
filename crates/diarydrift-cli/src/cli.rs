use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use diarydrift_core::models::MoodStyle;
use diarydrift_core::Mood;

#[derive(Parser)]
#[command(name = "diarydrift")]
#[command(about = "Keep a mood journal from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name for auth/sync configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recent entries and mood distribution
    Home {
        /// Keep refreshing until Ctrl-C
        #[arg(short, long)]
        watch: bool,
        /// Refresh interval in seconds (profile setting when omitted)
        #[arg(long, value_name = "SECS", requires = "watch")]
        interval: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage journal entries
    #[command(alias = "j")]
    Journal {
        #[command(subcommand)]
        command: JournalCommands,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show or edit the signed-in user's profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Export journal entries
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Embed photos and voice notes (JSON only)
        #[arg(long)]
        include_media: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Sync local replica with the remote database
    Sync,
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign in, register or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MoodChoice {
    Happy,
    Sad,
    Angry,
    Excited,
    Relaxed,
    /// Clear the mood
    #[value(name = "none")]
    Unset,
}

impl MoodChoice {
    pub const fn into_mood(self) -> Option<Mood> {
        match self {
            Self::Happy => Some(Mood::Happy),
            Self::Sad => Some(Mood::Sad),
            Self::Angry => Some(Mood::Angry),
            Self::Excited => Some(Mood::Excited),
            Self::Relaxed => Some(Mood::Relaxed),
            Self::Unset => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MoodStyleChoice {
    Emoji,
    Plain,
}

impl From<MoodStyleChoice> for MoodStyle {
    fn from(value: MoodStyleChoice) -> Self {
        match value {
            MoodStyleChoice::Emoji => Self::Emoji,
            MoodStyleChoice::Plain => Self::Plain,
        }
    }
}

#[derive(Subcommand)]
pub enum JournalCommands {
    /// Write a new entry
    #[command(alias = "new")]
    Add {
        /// Entry title
        #[arg(short, long)]
        title: String,
        /// Entry text (piped stdin or --editor when omitted)
        #[arg(short, long)]
        description: Option<String>,
        /// How you felt
        #[arg(short, long, value_enum)]
        mood: Option<MoodChoice>,
        /// Image file to attach
        #[arg(long, value_name = "PATH")]
        photo: Option<PathBuf>,
        /// Audio file to attach
        #[arg(long, value_name = "PATH")]
        voice: Option<PathBuf>,
        /// Write the description in $EDITOR
        #[arg(short, long, conflicts_with = "description")]
        editor: bool,
    },
    /// List entries, newest first
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry
    Show {
        /// Entry ID or unique ID prefix
        id: String,
        /// Output as JSON (includes media)
        #[arg(long)]
        json: bool,
        /// Write the attached photo to a file
        #[arg(long, value_name = "PATH")]
        save_photo: Option<PathBuf>,
        /// Write the attached voice note to a file
        #[arg(long, value_name = "PATH")]
        save_voice: Option<PathBuf>,
    },
    /// Edit an entry; fields not given keep their values
    Edit {
        /// Entry ID or unique ID prefix
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_enum)]
        mood: Option<MoodChoice>,
        #[arg(long, value_name = "PATH", conflicts_with = "remove_photo")]
        photo: Option<PathBuf>,
        #[arg(long, value_name = "PATH", conflicts_with = "remove_voice")]
        voice: Option<PathBuf>,
        /// Drop the attached photo
        #[arg(long)]
        remove_photo: bool,
        /// Drop the attached voice note
        #[arg(long)]
        remove_voice: bool,
        /// Edit the description in $EDITOR
        #[arg(short, long, conflicts_with = "description")]
        editor: bool,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List tasks
    List {
        /// Only tasks owned by the signed-in user
        #[arg(long)]
        mine: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one task
    Show {
        /// Task ID or unique ID prefix
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Edit a task
    Edit {
        /// Task ID or unique ID prefix
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID or unique ID prefix
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile, creating it on first use
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields
    Update {
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Set the profile picture from an image file
    Image {
        path: PathBuf,
    },
    /// Delete the profile document
    Delete {
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Backend sync token exchange endpoint
        #[arg(long, value_name = "URL")]
        sync_token_endpoint: Option<String>,
        /// Remote database URL (libsql://...)
        #[arg(long, value_name = "URL")]
        database_url: Option<String>,
        /// Remote database token, when not using the exchange endpoint
        #[arg(long, value_name = "TOKEN")]
        database_token: Option<String>,
        /// Home refresh interval in seconds
        #[arg(long, value_name = "SECS")]
        refresh_interval: Option<u64>,
        /// How moods are rendered
        #[arg(long, value_enum)]
        mood_style: Option<MoodStyleChoice>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email/password and store the session in the keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Must repeat --password
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
    },
    /// Show auth status for profile
    Status,
    /// Sign out and clear the stored session
    Logout,
}
