//! NIfTI image validation against sidecars, companions and the header.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value;

use crate::grammar::path_values;
use crate::input::{FileRef, NiftiHeader};
use crate::validation::issue::{Issue, IssueCode};

use super::{JsonObject, b_file_rows, inheritance_chain, merged_sidecar};

/// Allowed difference between header and sidecar repetition times, seconds.
const TR_TOLERANCE: f64 = 1e-3;

/// Dataset-wide state gathered in the first phase.
#[derive(Debug, Clone)]
pub struct NiftiContext<'a> {
    /// Parsed JSON sidecars by relative path.
    pub json_by_path: &'a HashMap<String, JsonObject>,
    /// Raw `.bval`/`.bvec` contents by relative path.
    pub bfile_by_path: &'a HashMap<String, String>,
    /// Relative path of every file in the dataset.
    pub file_paths: HashSet<&'a str>,
    /// Relative paths of events files.
    pub event_paths: &'a BTreeSet<String>,
}

impl<'a> NiftiContext<'a> {
    pub fn new(
        json_by_path: &'a HashMap<String, JsonObject>,
        bfile_by_path: &'a HashMap<String, String>,
        files: &'a [FileRef],
        event_paths: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            json_by_path,
            bfile_by_path,
            file_paths: files.iter().map(|f| f.relative_path.as_str()).collect(),
            event_paths,
        }
    }
}

/// Validates a NIfTI image using its merged sidecar metadata, its companion
/// files and, when available, its header.
pub struct NiftiValidator;

impl NiftiValidator {
    pub fn validate(
        &self,
        header: Option<&NiftiHeader>,
        file: &FileRef,
        context: &NiftiContext<'_>,
    ) -> Vec<Issue> {
        let path = file.relative_path.as_str();
        let Some(suffix) = path_values(path).modality else {
            return Vec::new();
        };
        let metadata = merged_sidecar(path, &suffix, context.json_by_path);

        let mut issues = Vec::new();
        self.check_units(file, &metadata, &mut issues);

        match suffix.as_str() {
            "bold" => {
                self.check_bold(header, file, &metadata, &mut issues);
                self.check_events(file, context, &mut issues);
                self.check_distortion_fields(file, &metadata, &mut issues);
            }
            "dwi" => {
                self.check_distortion_fields(file, &metadata, &mut issues);
                self.check_gradients(header, file, context, &mut issues);
            }
            "phasediff" => {
                if !has_number(&metadata, "EchoTime1") || !has_number(&metadata, "EchoTime2") {
                    issues.push(
                        Issue::for_file(IssueCode::FieldmapEchoTimesNotDefined, file)
                            .with_evidence("'EchoTime1' and 'EchoTime2' are required"),
                    );
                }
            }
            "phase1" | "phase2" => {
                if !has_number(&metadata, "EchoTime") {
                    issues.push(
                        Issue::for_file(IssueCode::FieldmapEchoTimesNotDefined, file)
                            .with_evidence("'EchoTime' is required"),
                    );
                }
            }
            "fieldmap" => {
                if !metadata.contains_key("Units") {
                    issues.push(Issue::for_file(IssueCode::FieldmapUnitsNotDefined, file));
                }
            }
            _ => {}
        }

        issues
    }

    /// Values that are almost certainly in milliseconds.
    fn check_units(&self, file: &FileRef, metadata: &JsonObject, issues: &mut Vec<Issue>) {
        if let Some(echo_time) = number(metadata, "EchoTime") {
            if echo_time > 1.0 {
                issues.push(
                    Issue::for_file(IssueCode::EchoTimeGreaterThan, file)
                        .with_evidence(format!("EchoTime: {}", echo_time)),
                );
            }
        }
        if let Some(readout) = number(metadata, "TotalReadoutTime") {
            if readout > 10.0 {
                issues.push(
                    Issue::for_file(IssueCode::TotalReadoutTimeGreaterThan, file)
                        .with_evidence(format!("TotalReadoutTime: {}", readout)),
                );
            }
        }
    }

    fn check_bold(
        &self,
        header: Option<&NiftiHeader>,
        file: &FileRef,
        metadata: &JsonObject,
        issues: &mut Vec<Issue>,
    ) {
        let repetition_time = number(metadata, "RepetitionTime");
        match repetition_time {
            None => issues.push(Issue::for_file(IssueCode::RepetitionTimeMustDefine, file)),
            Some(tr) if tr > 100.0 => issues.push(
                Issue::for_file(IssueCode::RepetitionTimeGreaterThan, file)
                    .with_evidence(format!("RepetitionTime: {}", tr)),
            ),
            Some(_) => {}
        }

        match metadata.get("SliceTiming").and_then(Value::as_array) {
            None => issues.push(Issue::for_file(IssueCode::SliceTimingNotDefined, file)),
            Some(times) => {
                if let Some(tr) = repetition_time {
                    let late: Vec<String> = times
                        .iter()
                        .filter_map(Value::as_f64)
                        .filter(|t| *t > tr)
                        .map(|t| t.to_string())
                        .collect();
                    if !late.is_empty() {
                        issues.push(
                            Issue::for_file(IssueCode::SliceTimingElements, file).with_evidence(
                                format!("RepetitionTime: {}, SliceTiming values: {}", tr, late.join(", ")),
                            ),
                        );
                    }
                }
            }
        }

        let Some(header) = header else {
            return;
        };
        match header.repetition_time() {
            None => issues.push(
                Issue::for_file(IssueCode::RepetitionTimeUnits, file)
                    .with_evidence(format!("xyzt_units: {}", header.xyzt_units)),
            ),
            Some(header_tr) => {
                if let Some(tr) = repetition_time {
                    if (header_tr - tr).abs() > TR_TOLERANCE {
                        issues.push(
                            Issue::for_file(IssueCode::RepetitionTimeMismatch, file).with_evidence(
                                format!("header: {:.4}s, sidecar: {:.4}s", header_tr, tr),
                            ),
                        );
                    }
                }
            }
        }
    }

    fn check_events(&self, file: &FileRef, context: &NiftiContext<'_>, issues: &mut Vec<Issue>) {
        let has_events = inheritance_chain(&file.relative_path, "events", ".tsv")
            .iter()
            .any(|candidate| context.event_paths.contains(candidate));
        if !has_events {
            issues.push(Issue::for_file(IssueCode::EventsTsvMissing, file));
        }
    }

    /// Fields needed for susceptibility distortion correction.
    fn check_distortion_fields(&self, file: &FileRef, metadata: &JsonObject, issues: &mut Vec<Issue>) {
        let fields = [
            ("EchoTime", IssueCode::EchoTimeNotDefined),
            ("PhaseEncodingDirection", IssueCode::PhaseEncodingDirectionNotDefined),
            ("EffectiveEchoSpacing", IssueCode::EffectiveEchoSpacingNotDefined),
            ("TotalReadoutTime", IssueCode::TotalReadoutTimeNotDefined),
        ];
        for (field, code) in fields {
            if !metadata.contains_key(field) {
                issues.push(Issue::for_file(code, file));
            }
        }
    }

    fn check_gradients(
        &self,
        header: Option<&NiftiHeader>,
        file: &FileRef,
        context: &NiftiContext<'_>,
        issues: &mut Vec<Issue>,
    ) {
        // Nearest companion along the chain that exists in the dataset.
        let nearest = |extension: &str| {
            inheritance_chain(&file.relative_path, "dwi", extension)
                .into_iter()
                .rev()
                .find(|candidate| context.file_paths.contains(candidate.as_str()))
        };

        if nearest(".bvec").is_none() {
            issues.push(Issue::for_file(IssueCode::DwiMissingBvec, file));
        }
        let Some(bval_path) = nearest(".bval") else {
            issues.push(Issue::for_file(IssueCode::DwiMissingBval, file));
            return;
        };
        // Unreadable b-value files were already reported in the first phase.
        let Some(bval) = context.bfile_by_path.get(&bval_path) else {
            return;
        };

        if let Some(header) = header {
            let bval_count = b_file_rows(bval).first().map(|row| row.len()).unwrap_or(0);
            let volumes = header.volume_count();
            if bval_count != volumes {
                issues.push(
                    Issue::for_file(IssueCode::VolumeCountMismatch, file).with_evidence(format!(
                        "header has {} volumes, .bval has {}",
                        volumes, bval_count
                    )),
                );
            }
        }
    }
}

fn number(metadata: &JsonObject, key: &str) -> Option<f64> {
    metadata.get(key).and_then(Value::as_f64)
}

fn has_number(metadata: &JsonObject, key: &str) -> bool {
    number(metadata, key).is_some()
}
