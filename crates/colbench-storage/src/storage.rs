use crate::schema;
use crate::types::{BenchmarkRecord, StoredRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{field} value {value} does not fit in an sqlite integer")]
    OutOfRange { field: &'static str, value: u64 },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Append-only store of benchmark results.
///
/// Cloning the store shares the underlying connection.
#[derive(Debug, Clone)]
pub struct ResultStore {
    conn: Arc<Mutex<Connection>>,
}

impl ResultStore {
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn open_uri(uri: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(uri, flags)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Append one record and return its row id.
    pub fn insert_record(&self, record: &BenchmarkRecord) -> Result<i64> {
        let file_size = to_sql_int("file_size", record.file_size_bytes)?;
        let memory_usage = record
            .memory_usage_bytes
            .map(|v| to_sql_int("memory_usage", v))
            .transpose()?;

        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute(
            r#"
            INSERT INTO benchmark_results (
              data_format, data_size, data_complexity, file_size,
              read_performance, write_performance, modify_performance,
              memory_usage, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                &record.format,
                &record.size,
                &record.complexity,
                file_size,
                record.read_seconds,
                record.write_seconds,
                record.modify_seconds,
                memory_usage,
                record
                    .recorded_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All stored records, oldest first.
    pub fn list_records(&self) -> Result<Vec<StoredRecord>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            r#"
            SELECT id, data_format, data_size, data_complexity, file_size,
                   read_performance, write_performance, modify_performance,
                   memory_usage, recorded_at
            FROM benchmark_results
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], |r| {
            let file_size: i64 = r.get(4)?;
            let memory_usage: Option<i64> = r.get(8)?;
            let recorded_at: String = r.get(9)?;
            Ok(StoredRecord {
                id: r.get(0)?,
                record: BenchmarkRecord {
                    format: r.get(1)?,
                    size: r.get(2)?,
                    complexity: r.get(3)?,
                    file_size_bytes: from_sql_int(4, file_size)?,
                    read_seconds: r.get(5)?,
                    write_seconds: r.get(6)?,
                    modify_seconds: r.get(7)?,
                    memory_usage_bytes: memory_usage.map(|v| from_sql_int(8, v)).transpose()?,
                    recorded_at: parse_timestamp(9, &recorded_at)?,
                },
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    pub fn record_count(&self) -> Result<u64> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM benchmark_results", [], |r| r.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn to_sql_int(field: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| StorageError::OutOfRange { field, value })
}

fn from_sql_int(idx: usize, value: i64) -> rusqlite::Result<u64> {
    u64::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
