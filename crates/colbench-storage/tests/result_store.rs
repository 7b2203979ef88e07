use chrono::{TimeZone, Utc};
use colbench_storage::{BenchmarkRecord, ResultStore, StorageError};
use rusqlite::Connection;

fn record(format: &str, file_size_bytes: u64) -> BenchmarkRecord {
    BenchmarkRecord {
        format: format.to_string(),
        size: "small".to_string(),
        complexity: "simple".to_string(),
        file_size_bytes,
        read_seconds: 0.25,
        write_seconds: 0.5,
        modify_seconds: 0.125,
        memory_usage_bytes: Some(4096),
        recorded_at: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
    }
}

#[test]
fn insert_assigns_increasing_ids_and_round_trips() {
    let store = ResultStore::open_in_memory().expect("open store");

    let first = store.insert_record(&record("csv", 100)).expect("insert csv");
    let mut second_record = record("parquet-snappy", 42);
    second_record.memory_usage_bytes = None;
    let second = store
        .insert_record(&second_record)
        .expect("insert parquet");
    assert!(second > first);

    let stored = store.list_records().expect("list");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, first);
    assert_eq!(stored[0].record, record("csv", 100));
    assert_eq!(stored[1].id, second);
    assert_eq!(stored[1].record, second_record);
    assert_eq!(store.record_count().unwrap(), 2);
}

#[test]
fn recorded_at_keeps_microseconds() {
    let store = ResultStore::open_in_memory().unwrap();
    let mut rec = record("parquet-gzip", 1);
    rec.recorded_at = Utc.timestamp_micros(1_700_000_000_123_456).unwrap();
    store.insert_record(&rec).unwrap();

    let stored = store.list_records().unwrap();
    assert_eq!(stored[0].record.recorded_at, rec.recorded_at);
}

#[test]
fn oversized_counters_are_rejected() {
    let store = ResultStore::open_in_memory().unwrap();
    let err = store
        .insert_record(&record("csv", u64::MAX))
        .expect_err("u64::MAX does not fit");
    assert!(matches!(
        err,
        StorageError::OutOfRange {
            field: "file_size",
            ..
        }
    ));
    assert_eq!(store.record_count().unwrap(), 0);
}

#[test]
fn records_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.db");

    {
        let store = ResultStore::open_path(&path).unwrap();
        store.insert_record(&record("csv", 10)).unwrap();
    }

    let store = ResultStore::open_path(&path).unwrap();
    assert_eq!(store.record_count().unwrap(), 1);
    assert_eq!(store.list_records().unwrap()[0].record.format, "csv");
}

#[test]
fn shared_memory_uri_is_visible_to_second_handle() {
    let uri = "file:colbench_shared?mode=memory&cache=shared";
    let store1 = ResultStore::open_uri(uri).unwrap();
    store1.insert_record(&record("csv", 5)).unwrap();

    let store2 = ResultStore::open_uri(uri).unwrap();
    assert_eq!(store2.record_count().unwrap(), 1);

    // Keep the first handle alive so the shared in-memory database isn't dropped.
    std::mem::drop(store1);
}

#[test]
fn legacy_table_gains_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE benchmark_results (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              data_format TEXT NOT NULL,
              data_size TEXT NOT NULL,
              data_complexity TEXT NOT NULL,
              file_size INT NOT NULL,
              read_performance FLOAT NOT NULL,
              write_performance FLOAT NOT NULL,
              recorded_at TIMESTAMP NOT NULL,
              created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .unwrap();
    }

    let store = ResultStore::open_path(&path).unwrap();
    store.insert_record(&record("csv", 7)).unwrap();
    let stored = store.list_records().unwrap();
    assert_eq!(stored[0].record.modify_seconds, 0.125);
    assert_eq!(stored[0].record.memory_usage_bytes, Some(4096));
}
