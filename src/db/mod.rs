//! Relational storage.
//!
//! A single SQLite database (via libsql) holds two tables:
//! - `rug_requests`: customer submissions and their status
//! - `users`: admin accounts with bcrypt password hashes
//!
//! The schema is created on open. Pass `:memory:` as the database URL for an
//! ephemeral store (tests, demos).

#![allow(missing_docs)]

pub mod store;

pub use store::{AdminUser, RugStore};
