//! Database bootstrap: connection pool and schema migrations

pub mod init;
pub mod migrations;

pub use init::{init_database, init_memory_database};
pub use migrations::{get_schema_version, latest_version, run_migrations};
