//! CSV codec.
//!
//! CSV keeps no type information: every value is written as text and every column is read back
//! as [`ColumnType::Text`]. Callers recover the intended types from the column-name prefixes
//! (see [`crate::declared_types`]) and coerce the raw columns themselves.

use chrono::{DateTime, NaiveDateTime};
use colbench_columnar::{
    ColumnData, ColumnSchema, ColumnType, Table, TableBuilder, TableError, Value,
    DATETIME_TEXT_FORMAT,
};
use std::fmt::Write as _;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("csv input has no header row")]
    MissingHeader,
    #[error("datetime value {0} is out of range")]
    DateTimeOutOfRange(i64),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Render microseconds since the epoch using [`DATETIME_TEXT_FORMAT`].
pub fn format_datetime_micros(micros: i64) -> Option<String> {
    let dt = DateTime::from_timestamp_micros(micros)?;
    Some(dt.naive_utc().format(DATETIME_TEXT_FORMAT).to_string())
}

/// Parse a textual timestamp back into microseconds since the epoch.
///
/// Accepts the space-separated layout written by this crate and the ISO `T` separator, with an
/// optional fractional part.
pub fn parse_datetime_micros(text: &str) -> Option<i64> {
    let text = text.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_micros())
}

pub fn write_table_to_csv<W: Write>(table: &Table, writer: W) -> Result<(), CsvError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(table.columns().iter().map(|c| c.name()))?;

    let mut field = String::new();
    for row in 0..table.row_count() {
        for column in table.columns() {
            field.clear();
            match column.data() {
                ColumnData::Integer(v) => {
                    let _ = write!(field, "{}", v[row]);
                }
                ColumnData::Float(v) => {
                    // `Display` for f64 is the shortest text that parses back to the same bits.
                    let _ = write!(field, "{}", v[row]);
                }
                ColumnData::Text(v) => field.push_str(&v[row]),
                ColumnData::DateTime(v) => {
                    let text = format_datetime_micros(v[row])
                        .ok_or(CsvError::DateTimeOutOfRange(v[row]))?;
                    field.push_str(&text);
                }
            }
            csv_writer.write_field(&field)?;
        }
        csv_writer.write_record(None::<&[u8]>)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read a CSV stream with a header row into a table of raw text columns.
pub fn read_csv_to_table<R: Read>(reader: R) -> Result<Table, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(CsvError::MissingHeader);
    }

    let schema = headers
        .iter()
        .map(|name| ColumnSchema {
            name: name.to_owned(),
            column_type: ColumnType::Text,
        })
        .collect();
    let mut builder = TableBuilder::new(schema);

    let mut record = csv::StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let row = record
            .iter()
            .map(|field| Value::Text(field.to_owned()))
            .collect();
        builder.append_row(row)?;
    }

    Ok(builder.finish()?)
}
