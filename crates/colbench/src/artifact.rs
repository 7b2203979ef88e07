//! Temporary artifact naming and cleanup.

use crate::dataset::{ComplexityClass, SizeClass};
use chrono::{DateTime, Utc};
use colbench_io::FormatKind;
use std::io;
use std::path::{Path, PathBuf};

/// Run identifier used as the leading component of every artifact name.
pub fn run_id(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y%m%d%H%M%S%6f").to_string()
}

/// `{run_id}_{size}_{complexity}` shared by every artifact of one group.
pub fn group_prefix(run_id: &str, size: SizeClass, complexity: ComplexityClass) -> String {
    format!("{run_id}_{size}_{complexity}")
}

pub fn artifact_file_name(
    run_id: &str,
    size: SizeClass,
    complexity: ComplexityClass,
    format: FormatKind,
) -> String {
    format!(
        "{}_{format}.{}",
        group_prefix(run_id, size, complexity),
        format.extension()
    )
}

/// Artifacts written for one (size, complexity) group.
///
/// Every registered path is removed by [`ArtifactGroup::cleanup`] or, failing that, when the
/// group is dropped. Paths that were never created are ignored.
#[derive(Debug)]
pub struct ArtifactGroup {
    dir: PathBuf,
    run_id: String,
    size: SizeClass,
    complexity: ComplexityClass,
    paths: Vec<PathBuf>,
}

impl ArtifactGroup {
    pub fn new(
        dir: impl Into<PathBuf>,
        run_id: impl Into<String>,
        size: SizeClass,
        complexity: ComplexityClass,
    ) -> Self {
        Self {
            dir: dir.into(),
            run_id: run_id.into(),
            size,
            complexity,
            paths: Vec::new(),
        }
    }

    pub fn prefix(&self) -> String {
        group_prefix(&self.run_id, self.size, self.complexity)
    }

    /// Register and return the artifact path for `format`.
    pub fn path_for(&mut self, format: FormatKind) -> PathBuf {
        let path = self.dir.join(artifact_file_name(
            &self.run_id,
            self.size,
            self.complexity,
            format,
        ));
        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }
        path
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every registered artifact and return how many files were removed.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.paths.drain(..) {
            match remove_if_present(&path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => {
                    log::warn!("failed to remove artifact {}: {err}", path.display());
                }
            }
        }
        removed
    }
}

impl Drop for ArtifactGroup {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_if_present(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
