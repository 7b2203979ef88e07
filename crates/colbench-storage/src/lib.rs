//! SQLite-backed storage for colbench results.
//!
//! Every benchmark condition produces one append-only row in `benchmark_results`, keyed by an
//! auto-incrementing id. This crate exposes:
//! - SQLite schema creation/migration
//! - Record insertion
//! - Read-back of stored rows (oldest first)

mod schema;
pub mod storage;
mod types;

pub use storage::{ResultStore, StorageError};
pub use types::{BenchmarkRecord, StoredRecord};
