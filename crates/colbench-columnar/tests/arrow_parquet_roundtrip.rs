#![cfg(feature = "arrow")]

use arrow_array::{ArrayRef, Float32Array, Int32Array, RecordBatch, TimestampMillisecondArray};
use arrow_schema::{DataType, Field, Schema, TimeUnit};
use colbench_columnar::arrow::{record_batch_to_table, table_to_record_batch};
use colbench_columnar::parquet::{
    read_parquet_bytes_to_table, read_parquet_to_table, write_table_to_parquet,
    write_table_to_parquet_bytes, Compression, GzipLevel,
};
use colbench_columnar::{Column, ColumnData, ColumnType, Table, Value};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn make_table() -> Table {
    Table::try_new(vec![
        Column::new("col_0", ColumnData::Integer(vec![0, 7, -3, i64::MAX])),
        Column::new(
            "str_col_0",
            ColumnData::Text(vec![
                "str_0".to_owned(),
                String::new(),
                "comma, \"quoted\"".to_owned(),
                "ünïcode".to_owned(),
            ]),
        ),
        Column::new(
            "date_col_0",
            ColumnData::DateTime(vec![
                1_700_000_000_123_456,
                0,
                -1,
                1_700_000_000_000_000,
            ]),
        ),
        Column::new(
            "float_col_0",
            ColumnData::Float(vec![0.0, 0.1 * 3.0, f64::MIN_POSITIVE, -2.5e300]),
        ),
    ])
    .expect("valid table")
}

#[test]
fn record_batch_roundtrip_preserves_types_and_values() -> Result<(), Box<dyn std::error::Error>> {
    let table = make_table();
    let batch = table_to_record_batch(&table)?;

    assert_eq!(batch.schema().field(0).data_type(), &DataType::Int64);
    assert_eq!(
        batch.schema().field(2).data_type(),
        &DataType::Timestamp(TimeUnit::Microsecond, None)
    );

    let table2 = record_batch_to_table(&batch)?;
    assert_eq!(table, table2);
    Ok(())
}

#[test]
fn parquet_bytes_roundtrip_for_every_codec() -> Result<(), Box<dyn std::error::Error>> {
    let table = make_table();
    for compression in [
        Compression::UNCOMPRESSED,
        Compression::SNAPPY,
        Compression::GZIP(GzipLevel::default()),
    ] {
        let bytes = write_table_to_parquet_bytes(&table, compression)?;
        let table2 = read_parquet_bytes_to_table(&bytes)?;
        assert_eq!(table, table2, "compression={compression:?}");
    }
    Ok(())
}

#[test]
fn parquet_path_roundtrip_preserves_schema() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("table.parquet");

    let table = make_table();
    write_table_to_parquet(&table, &path, Compression::SNAPPY)?;
    let table2 = read_parquet_to_table(&path)?;

    assert_eq!(table.schema(), table2.schema());
    assert_eq!(table2.get_cell(0, 3), Some(Value::Float(0.0)));
    assert_eq!(table, table2);
    Ok(())
}

#[test]
fn empty_table_roundtrips_through_parquet() -> Result<(), Box<dyn std::error::Error>> {
    let table = Table::try_new(vec![
        Column::new("col_0", ColumnData::Integer(Vec::new())),
        Column::new("str_col_0", ColumnData::Text(Vec::new())),
    ])?;
    let bytes = write_table_to_parquet_bytes(&table, Compression::UNCOMPRESSED)?;
    let table2 = read_parquet_bytes_to_table(&bytes)?;
    assert_eq!(table2.row_count(), 0);
    assert_eq!(table.schema(), table2.schema());
    Ok(())
}

#[test]
fn record_batch_import_widens_narrow_types() -> Result<(), Box<dyn std::error::Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("col_0", DataType::Int32, false),
        Field::new("float_col_0", DataType::Float32, false),
        Field::new(
            "date_col_0",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            false,
        ),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, -2])),
        Arc::new(Float32Array::from(vec![0.5_f32, 1.25])),
        Arc::new(TimestampMillisecondArray::from(vec![1_000, 2_500])),
    ];
    let batch = RecordBatch::try_new(schema, columns)?;

    let table = record_batch_to_table(&batch)?;
    let types: Vec<ColumnType> = table.columns().iter().map(Column::column_type).collect();
    assert_eq!(
        types,
        vec![ColumnType::Integer, ColumnType::Float, ColumnType::DateTime]
    );
    assert_eq!(table.get_cell(1, 0), Some(Value::Integer(-2)));
    assert_eq!(table.get_cell(1, 1), Some(Value::Float(1.25)));
    assert_eq!(table.get_cell(1, 2), Some(Value::DateTime(2_500_000)));
    Ok(())
}
