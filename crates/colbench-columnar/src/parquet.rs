//! Parquet read/write for [`Table`], layered on the Arrow interop in [`crate::arrow`].

use crate::arrow::{record_batches_to_table, table_to_record_batch, ArrowInteropError};
use crate::table::Table;
use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use ::parquet::errors::ParquetError;
use ::parquet::file::properties::WriterProperties;
use ::parquet::file::reader::ChunkReader;
use bytes::Bytes;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

pub use ::parquet::basic::{Compression, GzipLevel};

#[derive(Debug, Error)]
pub enum ParquetInteropError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parquet(#[from] ParquetError),
    #[error(transparent)]
    Arrow(#[from] ArrowInteropError),
}

fn writer_properties(compression: Compression) -> WriterProperties {
    WriterProperties::builder()
        .set_compression(compression)
        .set_created_by("colbench".to_owned())
        .build()
}

fn write_table<W: Write + Send>(
    table: &Table,
    sink: W,
    compression: Compression,
) -> Result<(), ParquetInteropError> {
    let batch = table_to_record_batch(table)?;
    let props = writer_properties(compression);
    let mut writer = ArrowWriter::try_new(sink, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write `table` to a Parquet file at `path`, replacing any existing file.
pub fn write_table_to_parquet(
    table: &Table,
    path: impl AsRef<Path>,
    compression: Compression,
) -> Result<(), ParquetInteropError> {
    let file = File::create(path.as_ref())?;
    write_table(table, file, compression)
}

pub fn write_table_to_parquet_bytes(
    table: &Table,
    compression: Compression,
) -> Result<Vec<u8>, ParquetInteropError> {
    let mut out = Vec::new();
    write_table(table, &mut out, compression)?;
    Ok(out)
}

fn read_table<R: ChunkReader + 'static>(reader: R) -> Result<Table, ParquetInteropError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let schema = builder.schema().clone();
    let batches = builder
        .build()?
        .collect::<Result<Vec<_>, _>>()
        .map_err(ArrowInteropError::from)?;
    Ok(record_batches_to_table(schema.as_ref(), &batches)?)
}

pub fn read_parquet_to_table(path: impl AsRef<Path>) -> Result<Table, ParquetInteropError> {
    let file = File::open(path.as_ref())?;
    read_table(file)
}

pub fn read_parquet_bytes_to_table(bytes: &[u8]) -> Result<Table, ParquetInteropError> {
    read_table(Bytes::copy_from_slice(bytes))
}
