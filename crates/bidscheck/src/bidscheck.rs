//! Main BidsCheck struct and public API.

use std::path::Path;

use tracing::info;

use crate::error::{BidsError, Result};
use crate::grammar::could_be_bids;
use crate::input::{FileRef, TreeConfig, TreeWalker};
use crate::report::{IssueAggregator, ValidationReport};
use crate::summary::SummaryBuilder;
use crate::validation::{ValidationPipeline, ValidatorOptions};

/// Configuration for a validation run.
#[derive(Debug, Clone)]
pub struct BidsCheckConfig {
    /// Validation options.
    pub options: ValidatorOptions,
    /// Worker threads (None = the global rayon pool).
    pub threads: Option<usize>,
    /// Follow symbolic links while enumerating a directory.
    pub follow_symlinks: bool,
}

impl Default for BidsCheckConfig {
    fn default() -> Self {
        Self {
            options: ValidatorOptions::default(),
            threads: None,
            follow_symlinks: true,
        }
    }
}

impl BidsCheckConfig {
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// The BIDS dataset validator.
pub struct BidsCheck {
    config: BidsCheckConfig,
    pipeline: ValidationPipeline,
}

impl BidsCheck {
    /// Create a validator with default configuration.
    pub fn new() -> Self {
        Self::with_config(BidsCheckConfig::default())
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: BidsCheckConfig) -> Self {
        let pipeline = ValidationPipeline::new(config.options);
        Self { config, pipeline }
    }

    /// Get the configuration.
    pub fn config(&self) -> &BidsCheckConfig {
        &self.config
    }

    /// Validate the dataset rooted at a directory.
    pub fn validate(&self, root: impl AsRef<Path>) -> Result<ValidationReport> {
        let root = root.as_ref();
        let walker = TreeWalker::with_config(TreeConfig {
            follow_symlinks: self.config.follow_symlinks,
        });
        self.validate_files(walker.files(root)?)
    }

    /// Validate a caller-provided file list.
    pub fn validate_files(&self, files: Vec<FileRef>) -> Result<ValidationReport> {
        if !could_be_bids(&files) {
            return Err(BidsError::NotBids);
        }
        info!("Validating {} files", files.len());

        let mut summary = SummaryBuilder::new();
        let context = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| BidsError::ThreadPool(e.to_string()))?;
                pool.install(|| self.pipeline.run(&files, &mut summary))
            }
            None => self.pipeline.run(&files, &mut summary),
        };

        let summary = summary.finish();
        let (errors, warnings) =
            IssueAggregator::aggregate(context.issues, &self.config.options, &summary);

        let report = ValidationReport::new(errors, warnings, summary);
        info!(
            "Found {} errors and {} warnings",
            report.error_count(),
            report.warning_count()
        );
        Ok(report)
    }
}

impl Default for BidsCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BidsCheckConfig::default();
        assert!(config.follow_symlinks);
        assert!(config.threads.is_none());
        assert!(!config.options.ignore_warnings);
    }

    #[test]
    fn test_rejects_non_bids_list() {
        let files = vec![
            FileRef::in_memory("/README", "hello"),
            FileRef::in_memory("/derivatives/sub-01/anat/sub-01_T1w.nii.gz", ""),
        ];
        let result = BidsCheck::new().validate_files(files);
        assert!(matches!(result, Err(BidsError::NotBids)));
    }

    #[test]
    fn test_zero_threads_uses_rayon_default() {
        let files = vec![FileRef::in_memory("/sub-01/anat/sub-01_T1w.nii.gz", "")];
        let config = BidsCheckConfig::default().with_threads(0);

        let report = BidsCheck::with_config(config).validate_files(files).unwrap();
        assert_eq!(report.summary.subjects, vec!["01"]);
    }
}
