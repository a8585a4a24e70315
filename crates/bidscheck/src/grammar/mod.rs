//! Path grammar: decides whether a dataset path is a legal BIDS name.
//!
//! Every path maps to exactly one [`PathCategory`]. The predicates are
//! independent and written to be disjoint; [`matching_categories`] exposes
//! all of them so overlaps can be tested for rather than resolved silently.
//!
//! # Example
//!
//! ```
//! use bidscheck::grammar::{classify, PathCategory};
//!
//! assert_eq!(classify("/sub-01/anat/sub-01_T1w.nii.gz"), PathCategory::Anat);
//! assert_eq!(classify("/sub-01/ses-01/anat/sub-01_T1w.nii.gz"), PathCategory::Invalid);
//! ```

mod patterns;
mod quick;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use quick::could_be_bids;

use patterns::*;

/// Structural category of a dataset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCategory {
    /// Dataset-level files at the root.
    TopLevel,
    /// `sub-*[_ses-*]_scans.tsv` manifests.
    SessionLevel,
    /// `sub-*_sessions.tsv` manifests.
    SubjectLevel,
    Anat,
    Dwi,
    Func,
    Behavioral,
    /// Physiological and stimulus recordings.
    Continuous,
    FieldMap,
    /// Anything under `/code/` or `/derivatives/`.
    CodeOrDerivatives,
    /// Anything under `/.git/`.
    VersionControl,
    /// No grammar matched.
    Invalid,
}

impl PathCategory {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PathCategory::TopLevel => "Top Level",
            PathCategory::SessionLevel => "Session Level",
            PathCategory::SubjectLevel => "Subject Level",
            PathCategory::Anat => "Anatomical",
            PathCategory::Dwi => "Diffusion",
            PathCategory::Func => "Functional",
            PathCategory::Behavioral => "Behavioral",
            PathCategory::Continuous => "Continuous Recording",
            PathCategory::FieldMap => "Field Map",
            PathCategory::CodeOrDerivatives => "Code or Derivatives",
            PathCategory::VersionControl => "Version Control",
            PathCategory::Invalid => "Invalid",
        }
    }

    /// Whether the path is accepted by the grammar.
    pub fn is_valid(&self) -> bool {
        *self != PathCategory::Invalid
    }

    /// Whether content under this category is skipped entirely.
    pub fn is_unchecked(&self) -> bool {
        matches!(
            self,
            PathCategory::CodeOrDerivatives | PathCategory::VersionControl
        )
    }
}

type Predicate = fn(&str) -> bool;

/// All grammar predicates, in reporting order.
const PREDICATES: &[(PathCategory, Predicate)] = &[
    (PathCategory::TopLevel, is_top_level),
    (PathCategory::CodeOrDerivatives, is_code_or_derivatives),
    (PathCategory::VersionControl, is_version_control),
    (PathCategory::SessionLevel, is_session_level),
    (PathCategory::SubjectLevel, is_subject_level),
    (PathCategory::Anat, is_anat),
    (PathCategory::Dwi, is_dwi),
    (PathCategory::Func, is_func),
    (PathCategory::Behavioral, is_behavioral),
    (PathCategory::Continuous, is_continuous),
    (PathCategory::FieldMap, is_field_map),
];

fn is_top_level(path: &str) -> bool {
    TOP_LEVEL_FILES.contains(&path)
        || FUNC_TOP.is_match(path)
        || ANAT_TOP.is_match(path)
        || DWI_TOP.is_match(path)
}

fn is_code_or_derivatives(path: &str) -> bool {
    CODE_OR_DERIVATIVES.is_match(path)
}

fn is_version_control(path: &str) -> bool {
    VERSION_CONTROL.is_match(path)
}

fn is_session_level(path: &str) -> bool {
    matches_entity(&SESSION_LEVEL, path)
}

fn is_subject_level(path: &str) -> bool {
    SUBJECT_LEVEL
        .captures(path)
        .map(|caps| caps["sub"] == caps["fsub"])
        .unwrap_or(false)
}

fn is_anat(path: &str) -> bool {
    matches_entity(&ANAT, path)
}

fn is_dwi(path: &str) -> bool {
    matches_entity(&DWI, path)
}

fn is_func(path: &str) -> bool {
    matches_entity(&FUNC, path)
}

fn is_behavioral(path: &str) -> bool {
    matches_entity(&BEHAVIORAL, path)
}

fn is_continuous(path: &str) -> bool {
    matches_entity(&CONTINUOUS, path)
}

fn is_field_map(path: &str) -> bool {
    matches_entity(&FIELDMAP, path)
}

/// Classify a root-relative path (leading `/`).
pub fn classify(path: &str) -> PathCategory {
    PREDICATES
        .iter()
        .find(|(_, matches)| matches(path))
        .map(|(category, _)| *category)
        .unwrap_or(PathCategory::Invalid)
}

/// Every category whose predicate accepts `path`.
///
/// The grammars are disjoint, so a valid path yields exactly one entry.
pub fn matching_categories(path: &str) -> Vec<PathCategory> {
    PREDICATES
        .iter()
        .filter(|(_, matches)| matches(path))
        .map(|(category, _)| *category)
        .collect()
}

/// Whether `path` is accepted by any grammar.
pub fn is_bids(path: &str) -> bool {
    classify(path).is_valid()
}

// =============================================================================
// PATH VALUES
// =============================================================================

static SUBJECT_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"sub-([^_/]*)").unwrap());
static SESSION_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"ses-([^_/]*)").unwrap());
static TASK_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"_task-([a-zA-Z0-9]+)").unwrap());

/// Labels extracted from a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathValues {
    pub subject: Option<String>,
    pub session: Option<String>,
    pub task: Option<String>,
    /// Suffix before the extension (`T1w`, `bold`, `epi`, ...).
    pub modality: Option<String>,
}

/// Extract subject, session, task and modality from a path.
///
/// A label runs from `sub-` or `ses-` to the next `_` or `/`; the first
/// occurrence in the path wins.
pub fn path_values(path: &str) -> PathValues {
    let capture = |re: &Regex| re.captures(path).map(|c| c[1].to_string());

    let name = path.rsplit('/').next().unwrap_or(path);
    let modality = name
        .rsplit('_')
        .next()
        .filter(|_| name.contains('_'))
        .map(|last| last.split('.').next().unwrap_or(last).to_string())
        .filter(|m| !m.is_empty());

    PathValues {
        subject: capture(&SUBJECT_LABEL),
        session: capture(&SESSION_LABEL),
        task: capture(&TASK_LABEL),
        modality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One representative valid path per category.
    const VALID_PATHS: &[(&str, PathCategory)] = &[
        ("/README", PathCategory::TopLevel),
        ("/CHANGES", PathCategory::TopLevel),
        ("/dataset_description.json", PathCategory::TopLevel),
        ("/participants.tsv", PathCategory::TopLevel),
        ("/task-rest_bold.json", PathCategory::TopLevel),
        ("/ses-01_task-rest_acq-fast_run-1_bold.json", PathCategory::TopLevel),
        ("/task-nback_events.tsv", PathCategory::TopLevel),
        ("/T1w.json", PathCategory::TopLevel),
        ("/acq-mprage_T1w.json", PathCategory::TopLevel),
        ("/dwi.bval", PathCategory::TopLevel),
        ("/run-1_dwi.json", PathCategory::TopLevel),
        ("/code/preprocess.py", PathCategory::CodeOrDerivatives),
        ("/derivatives/fmriprep/sub-01/anything.txt", PathCategory::CodeOrDerivatives),
        ("/.git/HEAD", PathCategory::VersionControl),
        ("/sub-01/sub-01_scans.tsv", PathCategory::SessionLevel),
        ("/sub-01/ses-01/sub-01_ses-01_scans.tsv", PathCategory::SessionLevel),
        ("/sub-01/sub-01_sessions.tsv", PathCategory::SubjectLevel),
        ("/sub-01/anat/sub-01_T1w.nii.gz", PathCategory::Anat),
        ("/sub-01/ses-01/anat/sub-01_ses-01_acq-mprage_run-2_T1w.nii", PathCategory::Anat),
        ("/sub-01/anat/sub-01_inplaneT2.json", PathCategory::Anat),
        ("/sub-01/dwi/sub-01_dwi.nii.gz", PathCategory::Dwi),
        ("/sub-01/dwi/sub-01_acq-64dir_dwi.bvec", PathCategory::Dwi),
        ("/sub-01/func/sub-01_task-rest_bold.nii.gz", PathCategory::Func),
        ("/sub-01/func/sub-01_task-rest_run-1_echo-2_bold.json", PathCategory::Func),
        ("/sub-01/func/sub-01_task-nback_events.tsv", PathCategory::Func),
        ("/sub-01/func/sub-01_task-rest_sbref.nii.gz", PathCategory::Func),
        ("/sub-01/beh/sub-01_task-stroop_events.tsv", PathCategory::Behavioral),
        ("/sub-01/beh/sub-01_task-stroop_beh.json", PathCategory::Behavioral),
        ("/sub-01/func/sub-01_task-rest_physio.tsv.gz", PathCategory::Continuous),
        ("/sub-01/func/sub-01_task-rest_recording-cardiac_physio.json", PathCategory::Continuous),
        ("/sub-01/beh/sub-01_task-stroop_stim.tsv.gz", PathCategory::Continuous),
        ("/sub-01/fmap/sub-01_phasediff.nii.gz", PathCategory::FieldMap),
        ("/sub-01/fmap/sub-01_magnitude1.nii.gz", PathCategory::FieldMap),
        ("/sub-01/ses-02/fmap/sub-01_ses-02_dir-AP_epi.json", PathCategory::FieldMap),
    ];

    const INVALID_PATHS: &[&str] = &[
        "/readme.txt",
        "/sub-01/anat/sub-01_T1.nii.gz",
        "/sub-01/anat/sub-01_T1w.nii.zip",
        "/sub-01/func/sub-01_bold.nii.gz",
        "/sub-01/anat/sub-02_T1w.nii.gz",
        "/sub-01/dwi/sub-01_dwi.txt",
        "/sub-01/fmap/sub-01_fieldmap.tsv",
        "/sub-01/sub-02_sessions.tsv",
        "/sub-01/sub-01_participants.tsv",
        "/sub-01/ses-01/sub-01_sessions.tsv",
        "/sub-01/anat/T1w.nii.gz",
        "/codebook/notes.txt",
        "/.gitignore",
        "",
        "/",
    ];

    #[test]
    fn test_valid_paths_classify() {
        for (path, expected) in VALID_PATHS {
            assert_eq!(classify(path), *expected, "path: {}", path);
        }
    }

    #[test]
    fn test_invalid_paths_rejected() {
        for path in INVALID_PATHS {
            assert_eq!(classify(path), PathCategory::Invalid, "path: {}", path);
            assert!(matching_categories(path).is_empty(), "path: {}", path);
        }
    }

    #[test]
    fn test_categories_are_mutually_exclusive() {
        for (path, expected) in VALID_PATHS {
            assert_eq!(matching_categories(path), vec![*expected], "path: {}", path);
        }
    }

    #[test]
    fn test_session_directory_without_filename_token() {
        for path in [
            "/sub-01/ses-01/anat/sub-01_T1w.nii.gz",
            "/sub-01/ses-01/dwi/sub-01_dwi.nii.gz",
            "/sub-01/ses-01/func/sub-01_task-rest_bold.nii.gz",
            "/sub-01/ses-01/beh/sub-01_task-stroop_events.tsv",
            "/sub-01/ses-01/func/sub-01_task-rest_physio.tsv.gz",
            "/sub-01/ses-01/fmap/sub-01_phasediff.nii.gz",
            "/sub-01/ses-01/sub-01_scans.tsv",
        ] {
            assert_eq!(classify(path), PathCategory::Invalid, "path: {}", path);
        }
    }

    #[test]
    fn test_filename_token_without_session_directory() {
        for path in [
            "/sub-01/anat/sub-01_ses-01_T1w.nii.gz",
            "/sub-01/dwi/sub-01_ses-01_dwi.nii.gz",
            "/sub-01/func/sub-01_ses-01_task-rest_bold.nii.gz",
            "/sub-01/beh/sub-01_ses-01_task-stroop_events.tsv",
            "/sub-01/func/sub-01_ses-01_task-rest_physio.tsv.gz",
            "/sub-01/fmap/sub-01_ses-01_phasediff.nii.gz",
            "/sub-01/sub-01_ses-01_scans.tsv",
        ] {
            assert_eq!(classify(path), PathCategory::Invalid, "path: {}", path);
        }
    }

    #[test]
    fn test_session_labels_must_agree() {
        assert_eq!(
            classify("/sub-01/ses-pre/anat/sub-01_ses-post_T1w.nii.gz"),
            PathCategory::Invalid
        );
        assert_eq!(
            classify("/sub-01/ses-pre/anat/sub-01_ses-pre_T1w.nii.gz"),
            PathCategory::Anat
        );
    }

    #[test]
    fn test_path_values() {
        let values = path_values("/sub-01/ses-02/func/sub-01_ses-02_task-rest_run-1_bold.nii.gz");

        assert_eq!(values.subject.as_deref(), Some("01"));
        assert_eq!(values.session.as_deref(), Some("02"));
        assert_eq!(values.task.as_deref(), Some("rest"));
        assert_eq!(values.modality.as_deref(), Some("bold"));
    }

    #[test]
    fn test_path_values_without_entities() {
        let values = path_values("/participants.tsv");
        assert_eq!(values, PathValues::default());
    }

    #[test]
    fn test_path_values_label_stops_at_separator() {
        let values = path_values("/sub-abc/sub-abc_sessions.tsv");
        assert_eq!(values.subject.as_deref(), Some("abc"));
        assert_eq!(values.modality.as_deref(), Some("sessions"));
    }

    #[test]
    fn test_path_values_label_keeps_punctuation() {
        let subject = path_values("/sub-ctl-01/anat/sub-ctl-01_T1w.nii.gz");
        assert_eq!(subject.subject.as_deref(), Some("ctl-01"));

        let session = path_values("/sub-01/ses-pre.1/anat/x.nii");
        assert_eq!(session.subject.as_deref(), Some("01"));
        assert_eq!(session.session.as_deref(), Some("pre.1"));
    }
}
