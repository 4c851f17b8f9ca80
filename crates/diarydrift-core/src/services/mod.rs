//! Service handles shared by every client.

mod database;
mod profiles;

pub use database::DatabaseService;
