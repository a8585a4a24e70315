//! bidscheck: structural and content validator for BIDS neuroimaging datasets.
//!
//! A dataset is a directory tree of imaging data, sidecar metadata and
//! tabular files whose names follow the Brain Imaging Data Structure. The
//! validator checks every path against the naming grammar, every file
//! against its content rules, and the dataset as a whole for consistency
//! across subjects.
//!
//! # Pipeline
//!
//! - **Quick test**: reject trees that hold no subject-level imaging data.
//! - **Phase 1** (parallel): classify each path, validate TSV, JSON and
//!   b-value/b-vector files, and build lookup maps.
//! - **Phase 2**: validate NIfTI images against their merged sidecars and
//!   headers, then compare scanning parameters and subject completeness.
//! - **Aggregation**: group issues by code, sort by path and split errors
//!   from warnings.
//!
//! # Example
//!
//! ```no_run
//! use bidscheck::BidsCheck;
//!
//! let report = BidsCheck::new().validate("ds001").unwrap();
//!
//! println!("Errors: {}", report.error_count());
//! println!("Subjects: {:?}", report.summary.subjects);
//! ```

pub mod error;
pub mod grammar;
pub mod input;
pub mod report;
pub mod summary;
pub mod validation;

mod bidscheck;

pub use crate::bidscheck::{BidsCheck, BidsCheckConfig};
pub use error::{BidsError, Result};
pub use grammar::{PathCategory, classify, could_be_bids};
pub use input::FileRef;
pub use report::{IssueAggregator, IssueFile, IssueGroup, ValidationReport};
pub use summary::{Summary, SummaryBuilder, group_modalities};
pub use validation::{Issue, IssueCode, Severity, ValidatorOptions};
