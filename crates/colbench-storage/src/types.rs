use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metrics for one (format, size, complexity) condition.
///
/// Built once after the write, read and modify phases of a condition have completed and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub format: String,
    pub size: String,
    pub complexity: String,
    pub file_size_bytes: u64,
    pub read_seconds: f64,
    pub write_seconds: f64,
    pub modify_seconds: f64,
    /// Approximate in-memory footprint of the table loaded in the read phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage_bytes: Option<u64>,
    pub recorded_at: DateTime<Utc>,
}

/// A persisted [`BenchmarkRecord`] together with its row id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: BenchmarkRecord,
}
