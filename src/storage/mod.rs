//! Document store backing the `store` output mode.
//!
//! Each finished record is kept as one JSON document in a per-family SQLite
//! table. Root URLs are unique per table.

mod documents;
mod migrations;
mod pool;

pub use documents::{insert_document, InsertOutcome};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
