//! Validation engine: per-file content checks, NIfTI checks and cross-file
//! consistency checks, run in two phases.

pub mod content;
mod context;
mod issue;
mod pipeline;

pub use context::ValidationContext;
pub use issue::{FIELDMAP_RELATED, Issue, IssueCode, Severity};
pub use pipeline::{ValidationPipeline, ValidatorOptions};
