//! Format codecs for the colbench benchmark runner.
//!
//! Tables are written to and read from one of the [`FormatKind`]s. Parquet artifacts keep the
//! native column types; CSV artifacts come back as raw text and rely on the column-name prefix
//! convention ([`declared_types`]) for their intended types.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use colbench_columnar::parquet::{
    read_parquet_to_table, write_table_to_parquet, ParquetInteropError,
};
use colbench_columnar::{ColumnType, Table};

pub mod csv;
mod format;

pub use crate::csv::{
    format_datetime_micros, parse_datetime_micros, read_csv_to_table, write_table_to_csv, CsvError,
};
pub use crate::format::{FormatKind, UnknownFormat};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error(transparent)]
    Parquet(#[from] ParquetInteropError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write {format} artifact `{path}`: {source}")]
    Write {
        path: PathBuf,
        format: FormatKind,
        #[source]
        source: CodecError,
    },
    #[error("failed to read {format} artifact `{path}`: {source}")]
    Read {
        path: PathBuf,
        format: FormatKind,
        #[source]
        source: CodecError,
    },
    #[error("failed to stat artifact `{path}`: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write `table` to `path` in the given format, replacing any existing file.
pub fn write_table(table: &Table, path: impl AsRef<Path>, format: FormatKind) -> Result<(), Error> {
    let path = path.as_ref();
    write_table_inner(table, path, format).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        format,
        source,
    })
}

fn write_table_inner(table: &Table, path: &Path, format: FormatKind) -> Result<(), CodecError> {
    log::debug!(
        "writing {} x {} table as {format} to {}",
        table.column_count(),
        table.row_count(),
        path.display()
    );
    match format.parquet_compression() {
        Some(compression) => write_table_to_parquet(table, path, compression)?,
        None => {
            let file = File::create(path)?;
            write_table_to_csv(table, BufWriter::new(file))?;
        }
    }
    Ok(())
}

/// Read a table previously written with [`write_table`].
///
/// CSV artifacts are returned as raw text columns.
pub fn read_table(path: impl AsRef<Path>, format: FormatKind) -> Result<Table, Error> {
    let path = path.as_ref();
    read_table_inner(path, format).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        format,
        source,
    })
}

fn read_table_inner(path: &Path, format: FormatKind) -> Result<Table, CodecError> {
    if format.is_schema_preserving() {
        return Ok(read_parquet_to_table(path)?);
    }
    let file = File::open(path)?;
    Ok(read_csv_to_table(BufReader::new(file))?)
}

/// Exact byte length of the artifact on disk.
pub fn file_size(path: impl AsRef<Path>) -> Result<u64, Error> {
    let path = path.as_ref();
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| Error::Stat {
            path: path.to_path_buf(),
            source,
        })
}

/// Intended type of every column according to the column-name prefix convention.
///
/// This is the only type information that survives a CSV round trip.
pub fn declared_types(table: &Table) -> Vec<Option<ColumnType>> {
    table
        .columns()
        .iter()
        .map(|c| ColumnType::from_name_prefix(c.name()))
        .collect()
}
