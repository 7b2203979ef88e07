//! The benchmark run loop.
//!
//! For every (size, complexity) group the dataset is generated once. Loop A writes and reads
//! it back in every format; loop B then reloads each artifact and times the transform. One
//! [`BenchmarkRecord`] per format is handed to the sink, and the group's artifacts are
//! removed before the next group starts.

use crate::artifact::{run_id, ArtifactGroup};
use crate::context::RunContext;
use crate::dataset::{generate, ComplexityClass, SizeClass};
use crate::error::BenchError;
use crate::transform::{apply, prepare};
use chrono::Utc;
use colbench_io::{file_size, read_table, write_table, FormatKind};
use colbench_storage::BenchmarkRecord;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupFailure {
    pub size: SizeClass,
    pub complexity: ComplexityClass,
    pub error: String,
}

/// Outcome of [`run_benchmark`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    /// Records handed to the sink. Persistence is reported separately by the sink worker.
    pub records: usize,
    pub failed_groups: Vec<GroupFailure>,
}

/// Loop A measurements for one format.
struct Measured {
    format: FormatKind,
    file_size_bytes: u64,
    write_seconds: f64,
    read_seconds: f64,
    memory_usage_bytes: u64,
}

/// Run every configured condition once.
pub fn run_benchmark(ctx: &RunContext) -> Result<RunSummary, BenchError> {
    ctx.config.validate()?;
    std::fs::create_dir_all(&ctx.work_dir).map_err(|source| BenchError::WorkDir {
        path: ctx.work_dir.clone(),
        source,
    })?;

    let run_id = ctx.run_id.clone().unwrap_or_else(|| run_id(Utc::now()));
    log::info!("starting benchmark run {run_id} in {}", ctx.work_dir.display());

    let mut summary = RunSummary {
        run_id,
        records: 0,
        failed_groups: Vec::new(),
    };

    for size in ctx.config.skipped_sizes() {
        log::warn!("skipping size class `{size}`; pass --include-large to run it");
    }

    for size in ctx.config.active_sizes() {
        for &complexity in &ctx.config.complexities {
            match run_group(ctx, &summary.run_id, size, complexity) {
                Ok(records) => summary.records += records,
                Err(err) if ctx.config.continue_on_error => {
                    log::error!("group {size}/{complexity} failed: {err}");
                    summary.failed_groups.push(GroupFailure {
                        size,
                        complexity,
                        error: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    log::info!(
        "benchmark run {} finished: {} record(s), {} failed group(s)",
        summary.run_id,
        summary.records,
        summary.failed_groups.len()
    );
    Ok(summary)
}

fn run_group(
    ctx: &RunContext,
    run_id: &str,
    size: SizeClass,
    complexity: ComplexityClass,
) -> Result<usize, BenchError> {
    let mut artifacts = ArtifactGroup::new(&ctx.work_dir, run_id, size, complexity);

    let started = Instant::now();
    let table = generate(size, complexity);
    log::info!(
        "generated {size}/{complexity}: {} columns x {} rows in {:.3}s",
        table.column_count(),
        table.row_count(),
        started.elapsed().as_secs_f64()
    );

    let mut measured = Vec::with_capacity(ctx.config.formats.len());
    for &format in &ctx.config.formats {
        let path = artifacts.path_for(format);

        let ((), write_seconds) = timed(|| write_table(&table, &path, format))?;
        let file_size_bytes = file_size(&path)?;
        let (reloaded, read_seconds) = timed(|| read_table(&path, format))?;

        log::info!(
            "{size}/{complexity} {format}: {file_size_bytes} bytes, \
             write {write_seconds:.3}s, read {read_seconds:.3}s"
        );
        measured.push(Measured {
            format,
            file_size_bytes,
            write_seconds,
            read_seconds,
            memory_usage_bytes: reloaded.memory_size_bytes() as u64,
        });
    }
    drop(table);

    let mut emitted = 0;
    for m in measured {
        let path = artifacts.path_for(m.format);
        let loaded = read_table(&path, m.format)?;
        let (mut loaded, plan) = prepare(loaded, !m.format.is_schema_preserving())?;

        let started = Instant::now();
        apply(&mut loaded, &plan);
        let modify_seconds = started.elapsed().as_secs_f64();
        drop(loaded);

        log::info!("{size}/{complexity} {}: modify {modify_seconds:.3}s", m.format);

        let record = BenchmarkRecord {
            format: m.format.to_string(),
            size: size.to_string(),
            complexity: complexity.to_string(),
            file_size_bytes: m.file_size_bytes,
            read_seconds: m.read_seconds,
            write_seconds: m.write_seconds,
            modify_seconds,
            memory_usage_bytes: Some(m.memory_usage_bytes),
            recorded_at: Utc::now(),
        };
        ctx.sink.dispatch(record);
        emitted += 1;
    }

    let removed = artifacts.cleanup();
    log::debug!("removed {removed} artifact(s) for {}", artifacts.prefix());
    Ok(emitted)
}

fn timed<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<(T, f64), E> {
    let started = Instant::now();
    let value = f()?;
    Ok((value, started.elapsed().as_secs_f64()))
}
