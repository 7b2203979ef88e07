//! Benchmark engine comparing CSV against Parquet (uncompressed, snappy, gzip).
//!
//! A run walks the size × complexity × format matrix described by a [`BenchConfig`]. For each
//! condition it records write, read and modify time plus the artifact size, and hands the
//! resulting [`BenchmarkRecord`] to a [`SinkHandle`] without waiting for it to be persisted.
//!
//! ```no_run
//! use colbench::{run_benchmark, BenchConfig, Backpressure, RunContext, SinkWorker};
//! use colbench_storage::ResultStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ResultStore::open_path("results.db")?;
//! let worker = SinkWorker::spawn(store, 64, Backpressure::Block)?;
//! let ctx = RunContext::new(".", worker.handle(), BenchConfig::default());
//! let summary = run_benchmark(&ctx)?;
//! drop(ctx);
//! let report = worker.shutdown()?;
//! assert_eq!(report.written as usize, summary.records);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod artifact;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod runner;
pub mod sink;
pub mod transform;

pub use colbench_storage::BenchmarkRecord;

pub use crate::config::BenchConfig;
pub use crate::context::RunContext;
pub use crate::dataset::{generate, generate_with_shape, ComplexityClass, SizeClass, UnknownClass};
pub use crate::error::BenchError;
pub use crate::runner::{run_benchmark, GroupFailure, RunSummary};
pub use crate::sink::{
    Backpressure, ResultSink, SinkError, SinkHandle, SinkReport, SinkWorker, UnknownBackpressure,
};
pub use crate::transform::{modify, TransformError, TransformPlan};
