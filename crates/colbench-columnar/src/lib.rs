//! Typed columnar tables for the colbench serialization benchmarks.
//!
//! This crate focuses on:
//! - A small column-major table model whose columns carry an explicit [`ColumnType`].
//! - Row-streaming construction for text decoders (see [`TableBuilder`]).
//! - Arrow `RecordBatch` interop and Parquet read/write (behind the `arrow` feature).

#![forbid(unsafe_code)]

mod table;
mod types;

#[cfg(feature = "arrow")]
pub mod arrow;
#[cfg(feature = "arrow")]
pub mod parquet;

pub use crate::table::{Column, ColumnData, ColumnSchema, Table, TableBuilder, TableError};
pub use crate::types::{ColumnType, Value, DATETIME_TEXT_FORMAT, MICROS_PER_DAY};
