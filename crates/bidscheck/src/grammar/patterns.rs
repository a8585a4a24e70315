//! Compiled path grammars.
//!
//! Entity grammars capture four labels: the subject and optional session from
//! the directories, and the subject and optional session repeated in the file
//! name. The `regex` crate has no backreferences or conditional groups, so
//! agreement between the two is checked by [`labels_agree`] after the match.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A BIDS label.
const L: &str = "[a-zA-Z0-9]+";
/// A BIDS index.
const N: &str = "[0-9]+";

/// Root files accepted verbatim.
pub(super) const TOP_LEVEL_FILES: &[&str] = &[
    "/README",
    "/CHANGES",
    "/dataset_description.json",
    "/participants.tsv",
    "/phasediff.json",
    "/phase1.json",
    "/phase2.json",
    "/fieldmap.json",
];

pub(super) const ANAT_SUFFIXES: &[&str] = &[
    "T1w",
    "T2w",
    "T1map",
    "T2map",
    "FLAIR",
    "FLASH",
    "PD",
    "PDmap",
    "PDT2",
    "inplaneT1",
    "inplaneT2",
    "angio",
    "defacemask",
    "SWImagandphase",
];

pub(super) const FIELDMAP_SUFFIXES: &[&str] = &[
    "phasediff",
    "phase1",
    "phase2",
    "magnitude1",
    "magnitude2",
    "magnitude",
    "fieldmap",
    "epi",
];

/// Alternation of literal tokens, with `.` escaped.
fn one_of(tokens: &[&str]) -> String {
    let escaped: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
    format!("(?:{})", escaped.join("|"))
}

/// Grammar for a data file inside `/sub-*/[ses-*/]<dir>/`.
fn entity_grammar(dir: &str, entities: &str, tail: &str) -> Regex {
    let pattern = format!(
        r"^/sub-(?P<sub>{L})(?:/ses-(?P<ses>{L}))?/{dir}/sub-(?P<fsub>{L})(?:_ses-(?P<fses>{L}))?{entities}{tail}$"
    );
    Regex::new(&pattern).unwrap()
}

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

pub(super) static FUNC_TOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^/(?:ses-{L}_)?task-{L}(?:_acq-{L})?(?:_rec-{L})?(?:_run-{N})?(?:_echo-{N})?_{}$",
        one_of(&["bold.json", "sbref.json", "events.tsv", "physio.json", "stim.json"])
    ))
    .unwrap()
});

pub(super) static ANAT_TOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^/(?:ses-{L}_)?(?:acq-{L}_)?(?:rec-{L}_)?(?:run-{N}_)?{}\.json$",
        one_of(ANAT_SUFFIXES)
    ))
    .unwrap()
});

pub(super) static DWI_TOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^/(?:ses-{L}_)?(?:acq-{L}_)?(?:rec-{L}_)?(?:run-{N}_)?dwi\.(?:json|bval|bvec)$"
    ))
    .unwrap()
});

pub(super) static CODE_OR_DERIVATIVES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(?:code|derivatives)/.+$").unwrap());

pub(super) static VERSION_CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/\.git/.+$").unwrap());

pub(super) static SESSION_LEVEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^/sub-(?P<sub>{L})(?:/ses-(?P<ses>{L}))?/sub-(?P<fsub>{L})(?:_ses-(?P<fses>{L}))?_scans\.tsv$"
    ))
    .unwrap()
});

pub(super) static SUBJECT_LEVEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^/sub-(?P<sub>{L})/sub-(?P<fsub>{L})_sessions\.tsv$"
    ))
    .unwrap()
});

pub(super) static ANAT: Lazy<Regex> = Lazy::new(|| {
    entity_grammar(
        "anat",
        &format!("(?:_acq-{L})?(?:_rec-{L})?(?:_run-{N})?"),
        &format!("_{}{}", one_of(ANAT_SUFFIXES), one_of(&[".nii.gz", ".nii", ".json"])),
    )
});

pub(super) static DWI: Lazy<Regex> = Lazy::new(|| {
    entity_grammar(
        "dwi",
        &format!("(?:_acq-{L})?(?:_rec-{L})?(?:_run-{N})?"),
        &format!("_dwi{}", one_of(&[".nii.gz", ".nii", ".json", ".bvec", ".bval"])),
    )
});

pub(super) static FUNC: Lazy<Regex> = Lazy::new(|| {
    entity_grammar(
        "func",
        &format!("_task-{L}(?:_acq-{L})?(?:_rec-{L})?(?:_run-{N})?(?:_echo-{N})?"),
        &format!(
            "_{}",
            one_of(&[
                "bold.nii.gz",
                "bold.nii",
                "bold.json",
                "sbref.nii.gz",
                "sbref.nii",
                "sbref.json",
                "events.tsv",
            ])
        ),
    )
});

pub(super) static BEHAVIORAL: Lazy<Regex> = Lazy::new(|| {
    entity_grammar(
        "beh",
        &format!("_task-{L}(?:_acq-{L})?(?:_rec-{L})?(?:_run-{N})?"),
        &format!("_{}", one_of(&["events.tsv", "beh.json"])),
    )
});

pub(super) static CONTINUOUS: Lazy<Regex> = Lazy::new(|| {
    entity_grammar(
        "(?:func|beh)",
        &format!("_task-{L}(?:_acq-{L})?(?:_rec-{L})?(?:_run-{N})?(?:_recording-{L})?"),
        &format!("_(?:physio|stim){}", one_of(&[".tsv.gz", ".json"])),
    )
});

pub(super) static FIELDMAP: Lazy<Regex> = Lazy::new(|| {
    entity_grammar(
        "fmap",
        &format!("(?:_acq-{L})?(?:_dir-{L})?(?:_run-{N})?"),
        &format!("_{}{}", one_of(FIELDMAP_SUFFIXES), one_of(&[".nii.gz", ".nii", ".json"])),
    )
});

/// Directory and file-name labels must agree.
///
/// The subject labels must be equal, and the sessions must be either both
/// absent or both present and equal. A session folder without the matching
/// `_ses-` token in the file name fails, and so does the reverse.
pub(super) fn labels_agree(caps: &Captures<'_>) -> bool {
    let subject_matches = match (caps.name("sub"), caps.name("fsub")) {
        (Some(dir), Some(file)) => dir.as_str() == file.as_str(),
        _ => false,
    };

    let session_matches = match (caps.name("ses"), caps.name("fses")) {
        (Some(dir), Some(file)) => dir.as_str() == file.as_str(),
        (None, None) => true,
        _ => false,
    };

    subject_matches && session_matches
}

/// Match `path` against an entity grammar and apply [`labels_agree`].
pub(super) fn matches_entity(grammar: &Regex, path: &str) -> bool {
    grammar
        .captures(path)
        .map(|caps| labels_agree(&caps))
        .unwrap_or(false)
}
