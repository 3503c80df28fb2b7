//! Local SQLite record store.
//!
//! This module provides:
//! - Database initialization and migrations
//! - A `Repository` implementing `RecordStore` for the `sales` and
//!   `employees` tables

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
