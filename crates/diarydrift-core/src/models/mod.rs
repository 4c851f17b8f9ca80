//! Data models for DiaryDrift

mod journal;
mod mood;
mod settings;
mod task;
mod user_profile;

pub use journal::{Journal, JournalDraft, JournalId};
pub use mood::Mood;
pub use settings::{MoodStyle, Settings};
pub use task::{Task, TaskDraft, TaskId};
pub use user_profile::{UserProfile, UserProfilePatch};
