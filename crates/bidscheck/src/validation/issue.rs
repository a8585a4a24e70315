//! Issue types and the static issue table.

use serde::{Deserialize, Serialize};

use crate::input::FileRef;

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Potential issue that should be reviewed.
    Warning,
    /// Definite violation of the standard.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Enumerated issue identifiers.
///
/// The numeric code, key, severity and message of each variant come from a
/// fixed table; the pipeline never assigns severities itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    NotIncluded,
    RepetitionTimeGreaterThan,
    EchoTimeGreaterThan,
    TotalReadoutTimeGreaterThan,
    SliceTimingElements,
    EchoTimeNotDefined,
    PhaseEncodingDirectionNotDefined,
    EffectiveEchoSpacingNotDefined,
    TotalReadoutTimeNotDefined,
    RepetitionTimeMustDefine,
    RepetitionTimeUnits,
    RepetitionTimeMismatch,
    SliceTimingNotDefined,
    FieldmapEchoTimesNotDefined,
    FieldmapUnitsNotDefined,
    EventsColumnOnset,
    EventsColumnDuration,
    TsvEqualRows,
    TsvEmptyCell,
    TsvImproperNa,
    EventsTsvMissing,
    NiftiHeaderUnreadable,
    JsonInvalid,
    VolumeCountMismatch,
    BvalMultipleRows,
    BvecNumberRows,
    DwiMissingBvec,
    DwiMissingBval,
    BFileNotNumeric,
    InconsistentSubjects,
    InconsistentParameters,
    FileRead,
}

/// Codes of warnings that only matter when the dataset has field maps.
pub const FIELDMAP_RELATED: [IssueCode; 4] = [
    IssueCode::EchoTimeNotDefined,
    IssueCode::PhaseEncodingDirectionNotDefined,
    IssueCode::EffectiveEchoSpacingNotDefined,
    IssueCode::TotalReadoutTimeNotDefined,
];

impl IssueCode {
    /// Every code, in ascending numeric order.
    pub const ALL: [IssueCode; 32] = [
        IssueCode::NotIncluded,
        IssueCode::RepetitionTimeGreaterThan,
        IssueCode::EchoTimeGreaterThan,
        IssueCode::TotalReadoutTimeGreaterThan,
        IssueCode::SliceTimingElements,
        IssueCode::EchoTimeNotDefined,
        IssueCode::PhaseEncodingDirectionNotDefined,
        IssueCode::EffectiveEchoSpacingNotDefined,
        IssueCode::TotalReadoutTimeNotDefined,
        IssueCode::RepetitionTimeMustDefine,
        IssueCode::RepetitionTimeUnits,
        IssueCode::RepetitionTimeMismatch,
        IssueCode::SliceTimingNotDefined,
        IssueCode::FieldmapEchoTimesNotDefined,
        IssueCode::FieldmapUnitsNotDefined,
        IssueCode::EventsColumnOnset,
        IssueCode::EventsColumnDuration,
        IssueCode::TsvEqualRows,
        IssueCode::TsvEmptyCell,
        IssueCode::TsvImproperNa,
        IssueCode::EventsTsvMissing,
        IssueCode::NiftiHeaderUnreadable,
        IssueCode::JsonInvalid,
        IssueCode::VolumeCountMismatch,
        IssueCode::BvalMultipleRows,
        IssueCode::BvecNumberRows,
        IssueCode::DwiMissingBvec,
        IssueCode::DwiMissingBval,
        IssueCode::BFileNotNumeric,
        IssueCode::InconsistentSubjects,
        IssueCode::InconsistentParameters,
        IssueCode::FileRead,
    ];

    /// Numeric code.
    pub fn code(&self) -> u16 {
        match self {
            IssueCode::NotIncluded => 1,
            IssueCode::RepetitionTimeGreaterThan => 2,
            IssueCode::EchoTimeGreaterThan => 3,
            IssueCode::TotalReadoutTimeGreaterThan => 4,
            IssueCode::SliceTimingElements => 5,
            IssueCode::EchoTimeNotDefined => 6,
            IssueCode::PhaseEncodingDirectionNotDefined => 7,
            IssueCode::EffectiveEchoSpacingNotDefined => 8,
            IssueCode::TotalReadoutTimeNotDefined => 9,
            IssueCode::RepetitionTimeMustDefine => 10,
            IssueCode::RepetitionTimeUnits => 11,
            IssueCode::RepetitionTimeMismatch => 12,
            IssueCode::SliceTimingNotDefined => 13,
            IssueCode::FieldmapEchoTimesNotDefined => 15,
            IssueCode::FieldmapUnitsNotDefined => 17,
            IssueCode::EventsColumnOnset => 20,
            IssueCode::EventsColumnDuration => 21,
            IssueCode::TsvEqualRows => 22,
            IssueCode::TsvEmptyCell => 23,
            IssueCode::TsvImproperNa => 24,
            IssueCode::EventsTsvMissing => 25,
            IssueCode::NiftiHeaderUnreadable => 26,
            IssueCode::JsonInvalid => 27,
            IssueCode::VolumeCountMismatch => 29,
            IssueCode::BvalMultipleRows => 30,
            IssueCode::BvecNumberRows => 31,
            IssueCode::DwiMissingBvec => 32,
            IssueCode::DwiMissingBval => 33,
            IssueCode::BFileNotNumeric => 34,
            IssueCode::InconsistentSubjects => 38,
            IssueCode::InconsistentParameters => 39,
            IssueCode::FileRead => 44,
        }
    }

    /// Look up a code by its number.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Stable machine-readable key.
    pub fn key(&self) -> &'static str {
        match self {
            IssueCode::NotIncluded => "NOT_INCLUDED",
            IssueCode::RepetitionTimeGreaterThan => "REPETITION_TIME_GREATER_THAN",
            IssueCode::EchoTimeGreaterThan => "ECHO_TIME_GREATER_THAN",
            IssueCode::TotalReadoutTimeGreaterThan => "TOTAL_READOUT_TIME_GREATER_THAN",
            IssueCode::SliceTimingElements => "SLICE_TIMING_ELEMENTS",
            IssueCode::EchoTimeNotDefined => "ECHO_TIME_NOT_DEFINED",
            IssueCode::PhaseEncodingDirectionNotDefined => "PHASE_ENCODING_DIRECTION_NOT_DEFINED",
            IssueCode::EffectiveEchoSpacingNotDefined => "EFFECTIVE_ECHO_SPACING_NOT_DEFINED",
            IssueCode::TotalReadoutTimeNotDefined => "TOTAL_READOUT_TIME_NOT_DEFINED",
            IssueCode::RepetitionTimeMustDefine => "REPETITION_TIME_MUST_DEFINE",
            IssueCode::RepetitionTimeUnits => "REPETITION_TIME_UNITS",
            IssueCode::RepetitionTimeMismatch => "REPETITION_TIME_MISMATCH",
            IssueCode::SliceTimingNotDefined => "SLICE_TIMING_NOT_DEFINED",
            IssueCode::FieldmapEchoTimesNotDefined => "FIELDMAP_ECHO_TIMES_NOT_DEFINED",
            IssueCode::FieldmapUnitsNotDefined => "FIELDMAP_UNITS_NOT_DEFINED",
            IssueCode::EventsColumnOnset => "EVENTS_COLUMN_ONSET",
            IssueCode::EventsColumnDuration => "EVENTS_COLUMN_DURATION",
            IssueCode::TsvEqualRows => "TSV_EQUAL_ROWS",
            IssueCode::TsvEmptyCell => "TSV_EMPTY_CELL",
            IssueCode::TsvImproperNa => "TSV_IMPROPER_NA",
            IssueCode::EventsTsvMissing => "EVENTS_TSV_MISSING",
            IssueCode::NiftiHeaderUnreadable => "NIFTI_HEADER_UNREADABLE",
            IssueCode::JsonInvalid => "JSON_INVALID",
            IssueCode::VolumeCountMismatch => "VOLUME_COUNT_MISMATCH",
            IssueCode::BvalMultipleRows => "BVAL_MULTIPLE_ROWS",
            IssueCode::BvecNumberRows => "BVEC_NUMBER_ROWS",
            IssueCode::DwiMissingBvec => "DWI_MISSING_BVEC",
            IssueCode::DwiMissingBval => "DWI_MISSING_BVAL",
            IssueCode::BFileNotNumeric => "B_FILE_NOT_NUMERIC",
            IssueCode::InconsistentSubjects => "INCONSISTENT_SUBJECTS",
            IssueCode::InconsistentParameters => "INCONSISTENT_PARAMETERS",
            IssueCode::FileRead => "FILE_READ",
        }
    }

    /// Severity assigned to this code.
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::RepetitionTimeGreaterThan
            | IssueCode::EchoTimeGreaterThan
            | IssueCode::TotalReadoutTimeGreaterThan
            | IssueCode::EchoTimeNotDefined
            | IssueCode::PhaseEncodingDirectionNotDefined
            | IssueCode::EffectiveEchoSpacingNotDefined
            | IssueCode::TotalReadoutTimeNotDefined
            | IssueCode::SliceTimingNotDefined
            | IssueCode::TsvImproperNa
            | IssueCode::EventsTsvMissing
            | IssueCode::InconsistentSubjects
            | IssueCode::InconsistentParameters => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Human-readable message template.
    pub fn reason(&self) -> &'static str {
        match self {
            IssueCode::NotIncluded => {
                "Files with such naming scheme are not part of BIDS specification. This error is most commonly caused by typos in file names that make them not BIDS compatible. Please consult the specification and make sure your files are named correctly."
            }
            IssueCode::RepetitionTimeGreaterThan => {
                "'RepetitionTime' is greater than 100. Are you sure it's expressed in seconds?"
            }
            IssueCode::EchoTimeGreaterThan => {
                "'EchoTime' is greater than 1. Are you sure it's expressed in seconds?"
            }
            IssueCode::TotalReadoutTimeGreaterThan => {
                "'TotalReadoutTime' is greater than 10. Are you sure it's expressed in seconds?"
            }
            IssueCode::SliceTimingElements => {
                "'SliceTiming' contains values greater than the 'RepetitionTime'."
            }
            IssueCode::EchoTimeNotDefined => {
                "You should define 'EchoTime' for this file. If you don't provide this information field map correction will not be possible."
            }
            IssueCode::PhaseEncodingDirectionNotDefined => {
                "You should define 'PhaseEncodingDirection' for this file. If you don't provide this information field map correction will not be possible."
            }
            IssueCode::EffectiveEchoSpacingNotDefined => {
                "You should define 'EffectiveEchoSpacing' for this file. If you don't provide this information field map correction will not be possible."
            }
            IssueCode::TotalReadoutTimeNotDefined => {
                "You should define 'TotalReadoutTime' for this file. If you don't provide this information field map correction using TOPUP might not be possible."
            }
            IssueCode::RepetitionTimeMustDefine => {
                "You have to define 'RepetitionTime' for this file."
            }
            IssueCode::RepetitionTimeUnits => {
                "Repetition time was not defined in seconds, milliseconds or microseconds in the scan's header."
            }
            IssueCode::RepetitionTimeMismatch => {
                "Repetition time defined in the JSON sidecar does not match the one in the NIfTI header."
            }
            IssueCode::SliceTimingNotDefined => {
                "You should define 'SliceTiming' for this file. If you don't provide this information slice time correction will not be possible."
            }
            IssueCode::FieldmapEchoTimesNotDefined => {
                "Field map sidecars must define their echo times: 'EchoTime1' and 'EchoTime2' for phasediff images, 'EchoTime' for phase1 and phase2 images."
            }
            IssueCode::FieldmapUnitsNotDefined => {
                "You have to define 'Units' for a fieldmap image."
            }
            IssueCode::EventsColumnOnset => {
                "First column of the events file must be named 'onset'."
            }
            IssueCode::EventsColumnDuration => {
                "Second column of the events file must be named 'duration'."
            }
            IssueCode::TsvEqualRows => {
                "All rows must have the same number of columns as there are headers."
            }
            IssueCode::TsvEmptyCell => {
                "Empty cell in TSV file detected: the proper way of labeling missing values is 'n/a'."
            }
            IssueCode::TsvImproperNa => {
                "A proper way of labeling missing values is 'n/a'."
            }
            IssueCode::EventsTsvMissing => {
                "Task scans should have a corresponding events.tsv file. If this is a resting state scan you can ignore this warning."
            }
            IssueCode::NiftiHeaderUnreadable => {
                "We were unable to parse the header data from this NIfTI file. Please ensure it is not corrupted or mislabeled."
            }
            IssueCode::JsonInvalid => "Not a valid JSON file.",
            IssueCode::VolumeCountMismatch => {
                "The number of volumes in this scan does not match the number of volumes in the corresponding .bval and .bvec files."
            }
            IssueCode::BvalMultipleRows => ".bval files should contain exactly one row of volumes.",
            IssueCode::BvecNumberRows => ".bvec files should contain exactly three rows of volumes.",
            IssueCode::DwiMissingBvec => "Each diffusion scan must have a corresponding .bvec file.",
            IssueCode::DwiMissingBval => "Each diffusion scan must have a corresponding .bval file.",
            IssueCode::BFileNotNumeric => ".bval and .bvec files must contain only numbers separated by whitespace.",
            IssueCode::InconsistentSubjects => {
                "Not all subjects contain the same files. Each subject should contain the same number of files with the same naming unless some files are known to be missing."
            }
            IssueCode::InconsistentParameters => {
                "Not all subjects/sessions/runs have the same scanning parameters."
            }
            IssueCode::FileRead => "We were unable to read this file.",
        }
    }

    /// Whether this warning is dropped when the dataset has no field maps.
    pub fn is_fieldmap_related(&self) -> bool {
        FIELDMAP_RELATED.contains(self)
    }
}

/// A single problem found in the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// What kind of problem this is.
    pub code: IssueCode,
    /// The file the problem was found in, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
    /// Supporting text (offending value, parser message, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// File-specific message overriding the code's template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 1-based line number for tabular files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Issue {
    /// Create a new issue.
    pub fn new(code: IssueCode) -> Self {
        Self {
            code,
            file: None,
            evidence: None,
            reason: None,
            line: None,
        }
    }

    /// Create an issue attached to a file.
    pub fn for_file(code: IssueCode, file: &FileRef) -> Self {
        Self::new(code).with_file(file.clone())
    }

    /// Set the file.
    pub fn with_file(mut self, file: FileRef) -> Self {
        self.file = Some(file);
        self
    }

    /// Set the evidence.
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// Set a file-specific reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the line number.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Severity from the issue table.
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Relative path of the attached file.
    pub fn path(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.relative_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_issue() {
        let file = FileRef::in_memory("/sub-01/anat/sub-01_T1w.json", "{");
        let issue = Issue::for_file(IssueCode::JsonInvalid, &file)
            .with_evidence("EOF while parsing an object");

        assert_eq!(issue.severity(), Severity::Error);
        assert_eq!(issue.path(), Some("/sub-01/anat/sub-01_T1w.json"));
        assert_eq!(issue.code.code(), 27);
    }

    #[test]
    fn test_codes_are_unique_and_sorted() {
        let codes: Vec<u16> = IssueCode::ALL.iter().map(|c| c.code()).collect();
        let unique: HashSet<u16> = codes.iter().copied().collect();

        assert_eq!(unique.len(), codes.len());
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_from_code_roundtrips_table() {
        for code in IssueCode::ALL {
            assert_eq!(IssueCode::from_code(code.code()), Some(code));
        }
        assert_eq!(IssueCode::from_code(14), None);
    }

    #[test]
    fn test_fieldmap_related_codes() {
        let numbers: Vec<u16> = FIELDMAP_RELATED.iter().map(|c| c.code()).collect();
        assert_eq!(numbers, vec![6, 7, 8, 9]);
        assert!(FIELDMAP_RELATED.iter().all(|c| c.severity() == Severity::Warning));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }
}
