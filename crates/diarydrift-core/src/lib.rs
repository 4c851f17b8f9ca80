//! diarydrift-core - Core library for DiaryDrift
//!
//! Models, the libSQL-backed journal/task/profile services, authentication,
//! inline media handling and the home screen aggregation shared by every
//! DiaryDrift client.

pub mod auth;
pub mod context;
pub mod db;
pub mod error;
pub mod export;
pub mod home;
pub mod media;
pub mod models;
pub mod refresh;
pub mod services;
pub mod sync;
pub mod theme;
pub mod util;

pub use context::AppContext;
pub use error::{Error, Result};
pub use models::{Journal, JournalDraft, JournalId, Mood};
pub use services::DatabaseService;
