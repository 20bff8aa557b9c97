//! Persistence layer: pooled SQLite access for users and calculation logs.

pub mod db;

pub use db::{create_pool, get_connection, DbConnection, DbPool};
