//! SQLite backend for the storefront store.
//!
//! Migrations live in `migrations/` and are embedded into the crate, so a binary can bring a fresh database up to
//! date with [`SqliteDatabase::run_migrations`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
