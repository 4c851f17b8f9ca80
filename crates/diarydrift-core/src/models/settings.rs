//! Application settings model

use serde::{Deserialize, Serialize};

/// How moods are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoodStyle {
    /// Emoji followed by the label
    #[default]
    Emoji,
    /// Label only
    Plain,
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mood rendering style
    pub mood_style: MoodStyle,
    /// Whether to paint mood colours with ANSI escapes
    pub use_color: bool,
    /// Home screen refresh interval in seconds
    pub refresh_interval_secs: u64,
    /// Upper bound for a single base64-encoded media field, in bytes
    pub max_media_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mood_style: MoodStyle::Emoji,
            use_color: true,
            refresh_interval_secs: 60,
            max_media_bytes: 1024 * 1024,
        }
    }
}
