use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colbench::{
    run_benchmark, Backpressure, BenchConfig, ComplexityClass, RunContext, RunSummary, SinkReport,
    SinkWorker, SizeClass,
};
use colbench_io::FormatKind;
use colbench_storage::ResultStore;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Benchmark CSV against Parquet on synthetic tables and store the results")]
struct Args {
    /// SQLite database that receives one row per benchmarked condition.
    #[arg(long, default_value = "benchmark_results.db")]
    db: PathBuf,

    /// Directory for temporary artifacts.
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Size classes to run (small, medium, large). Defaults to small and medium.
    #[arg(long = "size", value_delimiter = ',')]
    sizes: Vec<SizeClass>,

    /// Complexity classes to run (simple, complex). Defaults to both.
    #[arg(long = "complexity", value_delimiter = ',')]
    complexities: Vec<ComplexityClass>,

    /// Formats to benchmark. Defaults to all four.
    #[arg(long = "format", value_delimiter = ',')]
    formats: Vec<FormatKind>,

    /// Also run the large size class.
    #[arg(long)]
    include_large: bool,

    #[arg(long, default_value_t = 64)]
    sink_capacity: usize,

    /// What to do when the result queue is full: block or drop-newest.
    #[arg(long, default_value_t = Backpressure::Block)]
    backpressure: Backpressure,

    /// Keep going after a group fails instead of aborting the run.
    #[arg(long)]
    continue_on_error: bool,

    /// Prefix for artifact names. Defaults to the UTC start time.
    #[arg(long)]
    run_id: Option<String>,
}

impl Args {
    fn bench_config(&self) -> BenchConfig {
        let defaults = BenchConfig::default();
        BenchConfig {
            sizes: non_empty_or(&self.sizes, defaults.sizes),
            complexities: non_empty_or(&self.complexities, defaults.complexities),
            formats: non_empty_or(&self.formats, defaults.formats),
            include_large: self.include_large,
            sink_capacity: self.sink_capacity,
            backpressure: self.backpressure,
            continue_on_error: self.continue_on_error,
        }
    }
}

fn non_empty_or<T: Clone>(values: &[T], default: Vec<T>) -> Vec<T> {
    if values.is_empty() {
        default
    } else {
        values.to_vec()
    }
}

#[derive(Debug, Serialize)]
struct Output {
    #[serde(flatten)]
    summary: RunSummary,
    sink: SinkReport,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.bench_config();
    config.validate()?;

    let store = ResultStore::open_path(&args.db)
        .with_context(|| format!("open result store {}", args.db.display()))?;
    let worker = SinkWorker::spawn(store, config.sink_capacity, config.backpressure)
        .context("start result sink")?;

    let mut ctx = RunContext::new(args.work_dir.clone(), worker.handle(), config);
    ctx.run_id = args.run_id.clone();
    let outcome = run_benchmark(&ctx);
    drop(ctx);

    // Flush queued records even when the run itself failed.
    let sink = worker.shutdown().context("stop result sink")?;
    let summary = outcome.context("benchmark run failed")?;

    if sink.failed > 0 || sink.dropped > 0 {
        log::warn!(
            "{} record(s) failed to persist, {} dropped",
            sink.failed,
            sink.dropped
        );
    }

    let json = serde_json::to_string(&Output { summary, sink }).context("serialize run summary")?;
    println!("{json}");
    Ok(())
}
