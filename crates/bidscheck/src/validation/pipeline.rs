//! Two-phase validation pipeline.
//!
//! Phase 1 classifies every file, runs its content validator and gathers
//! the lookup maps. Phase 2 starts only once phase 1 has fully drained: it
//! validates NIfTI images against those maps and then runs the cross-file
//! checks. Both phases fan out over the current `rayon` pool.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::grammar::{PathCategory, classify, path_values};
use crate::input::{FileRef, NiftiHeader};
use crate::summary::SummaryBuilder;

use super::content::{
    ContentKind, ContentValidators, HeaderFieldValidator, NiftiValidator, Parsed, SessionValidator,
};
use super::context::ValidationContext;
use super::issue::{Issue, IssueCode};

/// Options controlling a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Drop every warning from the report.
    pub ignore_warnings: bool,
    /// Skip NIfTI header decoding.
    pub ignore_nifti_headers: bool,
}

impl ValidatorOptions {
    pub fn with_ignore_warnings(mut self, ignore: bool) -> Self {
        self.ignore_warnings = ignore;
        self
    }

    pub fn with_ignore_nifti_headers(mut self, ignore: bool) -> Self {
        self.ignore_nifti_headers = ignore;
        self
    }
}

/// What phase 1 learned about one file.
#[derive(Debug, Default)]
struct FileOutcome {
    category: Option<PathCategory>,
    issues: Vec<Issue>,
    parsed: Option<Parsed>,
    deferred_nifti: bool,
    events: bool,
}

/// Runs both validation phases over a file list.
pub struct ValidationPipeline {
    options: ValidatorOptions,
    validators: ContentValidators,
}

impl ValidationPipeline {
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            options,
            validators: ContentValidators::new(),
        }
    }

    /// Use a custom validator registry.
    pub fn with_validators(mut self, validators: ContentValidators) -> Self {
        self.validators = validators;
        self
    }

    /// Validate every file, recording statistics in `summary`.
    pub fn run(&self, files: &[FileRef], summary: &mut SummaryBuilder) -> ValidationContext {
        let mut context = ValidationContext::new();

        debug!("Phase 1: checking {} files", files.len());
        let outcomes: Vec<FileOutcome> = files.par_iter().map(|file| self.check_file(file)).collect();

        for (file, outcome) in files.iter().zip(outcomes) {
            let values = path_values(&file.relative_path);
            summary.record_file(file.size, &values);

            context.issues.extend(outcome.issues);
            if let Some(parsed) = outcome.parsed {
                context.store(&file.relative_path, parsed);
            }
            if outcome.deferred_nifti {
                summary.record_nifti(&values);
                context.niftis.push(file.clone());
            }
            if outcome.events {
                context.event_paths.insert(file.relative_path.clone());
            }
            if outcome.category == Some(PathCategory::Invalid) {
                debug!("Not part of the standard: {}", file.relative_path);
            }
        }

        debug!("Phase 2: checking {} NIfTI images", context.niftis.len());
        self.check_niftis(files, &mut context);

        let header_issues = HeaderFieldValidator.validate(&context.headers);
        context.issues.extend(header_issues);
        context.issues.extend(SessionValidator.validate(files));

        info!("Validation produced {} issues", context.issues.len());
        context
    }

    /// Phase 1 for a single file.
    fn check_file(&self, file: &FileRef) -> FileOutcome {
        let category = classify(&file.relative_path);
        let mut outcome = FileOutcome {
            category: Some(category),
            ..Default::default()
        };

        if !category.is_valid() {
            outcome.issues.push(Issue::for_file(IssueCode::NotIncluded, file));
            return outcome;
        }
        if category.is_unchecked() {
            return outcome;
        }

        let Some(kind) = ContentKind::detect(&file.name) else {
            return outcome;
        };
        if kind == ContentKind::Nifti {
            outcome.deferred_nifti = true;
            return outcome;
        }
        outcome.events = file.name.ends_with("_events.tsv");

        let Some(validator) = self.validators.get(kind) else {
            return outcome;
        };
        match file.read_text() {
            Ok(contents) => {
                let report = validator.validate(file, &contents);
                outcome.issues = report.issues;
                outcome.parsed = report.parsed;
            }
            Err(e) => {
                debug!("{} could not read {}: {}", validator.name(), file.relative_path, e);
                outcome
                    .issues
                    .push(Issue::for_file(IssueCode::FileRead, file).with_evidence(e.to_string()));
            }
        }
        outcome
    }

    /// Phase 2 NIfTI work: header reads and per-image validation.
    fn check_niftis(&self, files: &[FileRef], context: &mut ValidationContext) {
        let ignore_headers = self.options.ignore_nifti_headers;
        let results: Vec<(Vec<Issue>, Option<NiftiHeader>)> = {
            let lookups = context.nifti_context(files);
            context
                .niftis
                .par_iter()
                .map(|file| {
                    let mut issues = Vec::new();
                    let header = if ignore_headers {
                        None
                    } else {
                        match NiftiHeader::read(file) {
                            Ok(header) => Some(header),
                            Err(e) => {
                                issues.push(
                                    Issue::for_file(IssueCode::NiftiHeaderUnreadable, file)
                                        .with_evidence(e.to_string()),
                                );
                                None
                            }
                        }
                    };
                    issues.extend(NiftiValidator.validate(header.as_ref(), file, &lookups));
                    (issues, header)
                })
                .collect()
        };

        for (file, (issues, header)) in context.niftis.iter().zip(results) {
            context.issues.extend(issues);
            if let Some(header) = header {
                context.headers.push((file.clone(), header));
            }
        }
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new(ValidatorOptions::default())
    }
}
