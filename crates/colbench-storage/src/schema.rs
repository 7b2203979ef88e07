use rusqlite::Connection;

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS benchmark_results (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          data_format TEXT NOT NULL,
          data_size TEXT NOT NULL,
          data_complexity TEXT NOT NULL,
          file_size INT NOT NULL,
          read_performance FLOAT NOT NULL,
          write_performance FLOAT NOT NULL,
          modify_performance FLOAT NOT NULL,
          memory_usage INT,
          recorded_at TIMESTAMP NOT NULL,
          created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_benchmark_results_condition
          ON benchmark_results(data_format, data_size, data_complexity);
        "#,
    )?;

    // Databases created before the modify phase and memory sampling were recorded lack these
    // columns. SQLite only supports ADD COLUMN migrations, so add whatever is missing.
    ensure_result_columns(conn)?;

    Ok(())
}

fn ensure_result_columns(conn: &Connection) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(benchmark_results)")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut existing = std::collections::HashSet::new();
    for name in rows {
        existing.insert(name?);
    }

    if !existing.contains("modify_performance") {
        conn.execute(
            "ALTER TABLE benchmark_results ADD COLUMN modify_performance FLOAT NOT NULL DEFAULT 0",
            [],
        )?;
    }
    if !existing.contains("memory_usage") {
        conn.execute("ALTER TABLE benchmark_results ADD COLUMN memory_usage INT", [])?;
    }

    Ok(())
}
