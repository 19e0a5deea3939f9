//! Database layer for LightBnB.
//!
//! Provides SQLite connection pooling (via `r2d2`) and the embedded schema
//! migrations for the four tables the query layer reads and writes:
//! `users`, `properties`, `reservations` and `property_reviews`.
//!
//! The pool is meant to be created once at process start and handed to
//! whoever needs a connection. Nothing in this crate holds global state.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
