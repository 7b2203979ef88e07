//! Arrow interop for [`Table`].
//!
//! Column types map onto Arrow as:
//! - `Integer` <-> `Int64`
//! - `Float` <-> `Float64`
//! - `Text` <-> `Utf8`
//! - `DateTime` <-> `Timestamp(Microsecond, None)`
//!
//! On import a few neighbouring physical types are widened (`Int32`, `Float32`, `LargeUtf8`,
//! timestamps of any unit) so files produced by other writers can still be loaded.

use crate::table::{Column, ColumnData, Table, TableError};
use crate::types::ColumnType;
use arrow_array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    RecordBatch, RecordBatchOptions, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray,
};
use arrow_schema::{ArrowError, DataType, Field, Schema, SchemaRef, TimeUnit};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArrowInteropError {
    #[error("column `{column}` has unsupported arrow type {data_type}")]
    UnsupportedDataType { column: String, data_type: DataType },
    #[error("column `{column}` contains null values")]
    NullValues { column: String },
    #[error("record batch schema does not match the table schema")]
    SchemaMismatch,
    #[error(transparent)]
    Arrow(#[from] ArrowError),
    #[error(transparent)]
    Table(#[from] TableError),
}

pub fn data_type_for(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Integer => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Text => DataType::Utf8,
        ColumnType::DateTime => DataType::Timestamp(TimeUnit::Microsecond, None),
    }
}

fn column_type_for(field: &Field) -> Result<ColumnType, ArrowInteropError> {
    match field.data_type() {
        DataType::Int64 | DataType::Int32 => Ok(ColumnType::Integer),
        DataType::Float64 | DataType::Float32 => Ok(ColumnType::Float),
        DataType::Utf8 | DataType::LargeUtf8 => Ok(ColumnType::Text),
        DataType::Timestamp(_, _) => Ok(ColumnType::DateTime),
        other => Err(ArrowInteropError::UnsupportedDataType {
            column: field.name().clone(),
            data_type: other.clone(),
        }),
    }
}

pub fn table_schema_to_arrow(table: &Table) -> SchemaRef {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|c| Field::new(c.name(), data_type_for(c.column_type()), false))
        .collect();
    Arc::new(Schema::new(fields))
}

pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch, ArrowInteropError> {
    let schema = table_schema_to_arrow(table);
    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|c| column_to_array(c.data()))
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

fn column_to_array(data: &ColumnData) -> ArrayRef {
    match data {
        ColumnData::Integer(v) => Arc::new(Int64Array::from(v.clone())),
        ColumnData::Float(v) => Arc::new(Float64Array::from(v.clone())),
        ColumnData::Text(v) => Arc::new(StringArray::from_iter_values(v.iter())),
        ColumnData::DateTime(v) => Arc::new(TimestampMicrosecondArray::from(v.clone())),
    }
}

pub fn record_batch_to_table(batch: &RecordBatch) -> Result<Table, ArrowInteropError> {
    record_batches_to_table(batch.schema().as_ref(), std::slice::from_ref(batch))
}

/// Concatenate record batches sharing `schema` into one table.
///
/// An empty `batches` slice yields a zero-row table with the schema's columns.
pub fn record_batches_to_table(
    schema: &Schema,
    batches: &[RecordBatch],
) -> Result<Table, ArrowInteropError> {
    let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();

    let mut columns: Vec<(String, ColumnData)> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let column_type = column_type_for(field)?;
        columns.push((
            field.name().clone(),
            ColumnData::with_capacity(column_type, total_rows),
        ));
    }

    for batch in batches {
        if batch.num_columns() != columns.len() {
            return Err(ArrowInteropError::SchemaMismatch);
        }
        for (idx, (name, data)) in columns.iter_mut().enumerate() {
            append_array(name, data, batch.column(idx).as_ref())?;
        }
    }

    let columns = columns
        .into_iter()
        .map(|(name, data)| Column::new(name, data))
        .collect();
    Ok(Table::try_new(columns)?)
}

fn append_array(
    name: &str,
    data: &mut ColumnData,
    array: &dyn Array,
) -> Result<(), ArrowInteropError> {
    if array.null_count() > 0 {
        return Err(ArrowInteropError::NullValues {
            column: name.to_owned(),
        });
    }

    let unsupported = || ArrowInteropError::UnsupportedDataType {
        column: name.to_owned(),
        data_type: array.data_type().clone(),
    };
    let any = array.as_any();

    match data {
        ColumnData::Integer(out) => {
            if let Some(a) = any.downcast_ref::<Int64Array>() {
                out.extend_from_slice(a.values());
            } else if let Some(a) = any.downcast_ref::<Int32Array>() {
                out.extend(a.values().iter().map(|v| i64::from(*v)));
            } else {
                return Err(unsupported());
            }
        }
        ColumnData::Float(out) => {
            if let Some(a) = any.downcast_ref::<Float64Array>() {
                out.extend_from_slice(a.values());
            } else if let Some(a) = any.downcast_ref::<Float32Array>() {
                out.extend(a.values().iter().map(|v| f64::from(*v)));
            } else {
                return Err(unsupported());
            }
        }
        ColumnData::Text(out) => {
            if let Some(a) = any.downcast_ref::<StringArray>() {
                out.extend((0..a.len()).map(|i| a.value(i).to_owned()));
            } else if let Some(a) = any.downcast_ref::<LargeStringArray>() {
                out.extend((0..a.len()).map(|i| a.value(i).to_owned()));
            } else {
                return Err(unsupported());
            }
        }
        ColumnData::DateTime(out) => match array.data_type() {
            DataType::Timestamp(TimeUnit::Microsecond, _) => {
                let a = any
                    .downcast_ref::<TimestampMicrosecondArray>()
                    .ok_or_else(unsupported)?;
                out.extend_from_slice(a.values());
            }
            DataType::Timestamp(TimeUnit::Millisecond, _) => {
                let a = any
                    .downcast_ref::<TimestampMillisecondArray>()
                    .ok_or_else(unsupported)?;
                out.extend(a.values().iter().map(|v| v.saturating_mul(1_000)));
            }
            DataType::Timestamp(TimeUnit::Second, _) => {
                let a = any
                    .downcast_ref::<TimestampSecondArray>()
                    .ok_or_else(unsupported)?;
                out.extend(a.values().iter().map(|v| v.saturating_mul(1_000_000)));
            }
            DataType::Timestamp(TimeUnit::Nanosecond, _) => {
                let a = any
                    .downcast_ref::<TimestampNanosecondArray>()
                    .ok_or_else(unsupported)?;
                out.extend(a.values().iter().map(|v| v.div_euclid(1_000)));
            }
            _ => return Err(unsupported()),
        },
    }

    Ok(())
}
