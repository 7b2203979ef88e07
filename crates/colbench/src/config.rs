use crate::dataset::{ComplexityClass, SizeClass};
use crate::error::BenchError;
use crate::sink::Backpressure;
use colbench_io::FormatKind;

/// Which conditions a run covers and how results are delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub sizes: Vec<SizeClass>,
    pub complexities: Vec<ComplexityClass>,
    pub formats: Vec<FormatKind>,
    /// Adds [`SizeClass::Large`] to the run. Off by default because a large group holds a
    /// million rows by a thousand columns in memory.
    pub include_large: bool,
    /// Records that may wait in the sink queue before [`Backpressure`] applies.
    pub sink_capacity: usize,
    pub backpressure: Backpressure,
    /// Log a failed group and move on instead of aborting the run.
    pub continue_on_error: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![SizeClass::Small, SizeClass::Medium],
            complexities: ComplexityClass::ALL.to_vec(),
            formats: FormatKind::ALL.to_vec(),
            include_large: false,
            sink_capacity: 64,
            backpressure: Backpressure::Block,
            continue_on_error: false,
        }
    }
}

impl BenchConfig {
    /// Sizes in run order. `Large` only appears when `include_large` is set.
    pub fn active_sizes(&self) -> Vec<SizeClass> {
        let mut sizes: Vec<SizeClass> = Vec::with_capacity(self.sizes.len() + 1);
        for &size in &self.sizes {
            if size == SizeClass::Large && !self.include_large {
                continue;
            }
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }
        if self.include_large && !sizes.contains(&SizeClass::Large) {
            sizes.push(SizeClass::Large);
        }
        sizes
    }

    /// Requested sizes that [`BenchConfig::active_sizes`] leaves out.
    pub fn skipped_sizes(&self) -> Vec<SizeClass> {
        if self.include_large || !self.sizes.contains(&SizeClass::Large) {
            Vec::new()
        } else {
            vec![SizeClass::Large]
        }
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        if self.sink_capacity == 0 {
            return Err(BenchError::Config("sink capacity must be at least 1".into()));
        }
        if self.active_sizes().is_empty() {
            return Err(BenchError::Config("no size class selected".into()));
        }
        if self.complexities.is_empty() {
            return Err(BenchError::Config("no complexity class selected".into()));
        }
        if self.formats.is_empty() {
            return Err(BenchError::Config("no format selected".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_small_and_medium_only() {
        let config = BenchConfig::default();
        assert_eq!(
            config.active_sizes(),
            vec![SizeClass::Small, SizeClass::Medium]
        );
        assert_eq!(config.formats.len(), 4);
        assert_eq!(config.sink_capacity, 64);
        assert!(config.skipped_sizes().is_empty());
        assert!(!config.continue_on_error);
        config.validate().unwrap();
    }

    #[test]
    fn include_large_appends_large_once() {
        let config = BenchConfig {
            sizes: vec![SizeClass::Large, SizeClass::Small],
            include_large: true,
            ..BenchConfig::default()
        };
        assert_eq!(
            config.active_sizes(),
            vec![SizeClass::Large, SizeClass::Small]
        );
        assert!(config.skipped_sizes().is_empty());

        let config = BenchConfig {
            include_large: true,
            ..BenchConfig::default()
        };
        assert_eq!(
            config.active_sizes(),
            vec![SizeClass::Small, SizeClass::Medium, SizeClass::Large]
        );
    }

    #[test]
    fn large_without_flag_is_skipped() {
        let config = BenchConfig {
            sizes: vec![SizeClass::Large],
            ..BenchConfig::default()
        };
        assert!(config.active_sizes().is_empty());
        assert_eq!(config.skipped_sizes(), vec![SizeClass::Large]);
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = BenchConfig {
            sink_capacity: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }
}
