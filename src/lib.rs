//! Core library surface for the Avian Registry.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the test suites can reuse the same pieces: an
//! embedded SQLite repository, the role-based menu definitions, and the
//! table/CSV report helpers.
pub mod access;
pub mod cli;
pub mod db;
pub mod models;
pub mod report;

/// Convenience re-exports for the persistence layer. These are what `main.rs`
/// needs to bring up the embedded SQLite store.
pub use db::{ensure_schema, DbError};

/// The primary domain types other layers manipulate.
pub use models::{Role, Sighting, Species, User};

/// The interactive entry point.
pub use cli::run;
