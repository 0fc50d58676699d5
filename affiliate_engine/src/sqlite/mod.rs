//! SQLite backend for the affiliate ledger.
//!
//! The schema lives in `migrations/` and is embedded into the binary with `sqlx::migrate!`.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
