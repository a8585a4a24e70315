//! Content validators for individual dataset files.
//!
//! Per-file validators implement [`ContentValidator`] and are picked through
//! a suffix lookup table ([`ContentKind::detect`]). NIfTI images are not
//! validated here: they need dataset-wide state and run in the second phase
//! of the pipeline ([`NiftiValidator`]), together with the cross-file checks
//! ([`HeaderFieldValidator`], [`SessionValidator`]).

mod bfile;
mod headers;
mod json;
mod nifti;
mod sessions;
mod sidecar;
mod tsv;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::input::FileRef;

use super::issue::Issue;

pub use bfile::{BvalValidator, BvecValidator, b_file_rows};
pub use headers::HeaderFieldValidator;
pub use json::JsonValidator;
pub use nifti::{NiftiContext, NiftiValidator};
pub use sessions::SessionValidator;
pub use sidecar::{inheritance_chain, merged_sidecar};
pub use tsv::TsvValidator;

/// A parsed JSON sidecar.
pub type JsonObject = Map<String, Value>;

/// Kind of content a file holds, decided by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Nifti,
    Tsv,
    Bval,
    Bvec,
    Json,
}

/// Suffix lookup table; first match wins.
const DISPATCH: &[(&str, ContentKind)] = &[
    (".nii.gz", ContentKind::Nifti),
    (".nii", ContentKind::Nifti),
    (".tsv", ContentKind::Tsv),
    (".bval", ContentKind::Bval),
    (".bvec", ContentKind::Bvec),
    (".json", ContentKind::Json),
];

impl ContentKind {
    /// Content kind for a file name, if any validator handles it.
    pub fn detect(name: &str) -> Option<Self> {
        DISPATCH
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|(_, kind)| *kind)
    }
}

/// Something a validator extracted for later cross-file checks.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// A JSON sidecar object.
    Json(JsonObject),
    /// Raw contents of a `.bval` or `.bvec` file.
    BFile(String),
}

/// Output of a per-file content validator.
#[derive(Debug, Clone, Default)]
pub struct ContentReport {
    pub issues: Vec<Issue>,
    pub parsed: Option<Parsed>,
}

impl ContentReport {
    /// A report carrying only issues.
    pub fn issues(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            parsed: None,
        }
    }
}

/// Trait for per-file content validators.
pub trait ContentValidator: Send + Sync {
    /// Validate one file's text and return its issues and parsed content.
    fn validate(&self, file: &FileRef, contents: &str) -> ContentReport;

    /// Get the validator name.
    fn name(&self) -> &'static str;
}

/// Registry of per-file validators keyed by content kind.
pub struct ContentValidators {
    validators: IndexMap<ContentKind, Box<dyn ContentValidator>>,
}

impl ContentValidators {
    /// Create a registry with the default validators.
    pub fn new() -> Self {
        let mut validators: IndexMap<ContentKind, Box<dyn ContentValidator>> = IndexMap::new();
        validators.insert(ContentKind::Tsv, Box::new(TsvValidator));
        validators.insert(ContentKind::Bval, Box::new(BvalValidator));
        validators.insert(ContentKind::Bvec, Box::new(BvecValidator));
        validators.insert(ContentKind::Json, Box::new(JsonValidator));
        Self { validators }
    }

    /// Replace or add the validator for a kind.
    pub fn with_validator(mut self, kind: ContentKind, validator: impl ContentValidator + 'static) -> Self {
        self.validators.insert(kind, Box::new(validator));
        self
    }

    /// Validator for a kind.
    pub fn get(&self, kind: ContentKind) -> Option<&dyn ContentValidator> {
        self.validators.get(&kind).map(|v| v.as_ref())
    }
}

impl Default for ContentValidators {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_content_kind() {
        assert_eq!(ContentKind::detect("sub-01_T1w.nii.gz"), Some(ContentKind::Nifti));
        assert_eq!(ContentKind::detect("sub-01_T1w.nii"), Some(ContentKind::Nifti));
        assert_eq!(ContentKind::detect("sub-01_task-a_events.tsv"), Some(ContentKind::Tsv));
        assert_eq!(ContentKind::detect("sub-01_dwi.bval"), Some(ContentKind::Bval));
        assert_eq!(ContentKind::detect("sub-01_dwi.bvec"), Some(ContentKind::Bvec));
        assert_eq!(ContentKind::detect("dataset_description.json"), Some(ContentKind::Json));
        assert_eq!(ContentKind::detect("sub-01_task-a_physio.tsv.gz"), None);
        assert_eq!(ContentKind::detect("README"), None);
    }

    #[test]
    fn test_registry_covers_every_per_file_kind() {
        let registry = ContentValidators::new();
        for kind in [ContentKind::Tsv, ContentKind::Bval, ContentKind::Bvec, ContentKind::Json] {
            assert!(registry.get(kind).is_some(), "{:?}", kind);
        }
        assert!(registry.get(ContentKind::Nifti).is_none());
    }
}
