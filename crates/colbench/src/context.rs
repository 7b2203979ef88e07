use crate::config::BenchConfig;
use crate::sink::SinkHandle;
use std::path::PathBuf;

/// Everything a run needs from its caller.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory that receives the temporary artifacts. Created if missing.
    pub work_dir: PathBuf,
    pub sink: SinkHandle,
    pub config: BenchConfig,
    /// Fixed run id. Derived from the start time when `None`.
    pub run_id: Option<String>,
}

impl RunContext {
    pub fn new(work_dir: impl Into<PathBuf>, sink: SinkHandle, config: BenchConfig) -> Self {
        Self {
            work_dir: work_dir.into(),
            sink,
            config,
            run_id: None,
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }
}
