//! Database layer for DiaryDrift

mod connection;
mod journal_repository;
mod migrations;
mod task_repository;
mod user_repository;

pub use connection::{Database, SyncConfig};
pub use journal_repository::{JournalRepository, LibSqlJournalRepository};
pub use task_repository::{LibSqlTaskRepository, TaskRepository};
pub use user_repository::{LibSqlUserRepository, UserRepository};
