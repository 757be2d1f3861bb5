//! SQLite-backed persistence.

pub mod schema;
mod store;
mod tasks;

pub use store::SqliteAdapter;
