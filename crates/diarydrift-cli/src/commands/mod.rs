pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod export;
pub mod home;
pub mod journal;
pub mod profile;
pub mod sync;
pub mod task;
