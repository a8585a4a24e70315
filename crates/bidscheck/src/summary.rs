//! Dataset summary statistics.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::grammar::PathValues;

/// Modality grouping rules, applied in order.
///
/// Each rule's members are consumed from the working set before the next
/// rule is tested, so a lone `epi` only counts as a field map when no other
/// field map layout already claimed the set.
const GROUPING_RULES: &[(&[&str], &str)] = &[
    (&["magnitude1", "magnitude2", "phase1", "phase2"], "fieldmap"),
    (&["magnitude1", "magnitude2", "phasediff"], "fieldmap"),
    (&["magnitude", "fieldmap"], "fieldmap"),
    (&["epi"], "fieldmap"),
];

/// Collapse related modality suffixes into group labels.
pub fn group_modalities<I, S>(modalities: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut working: BTreeSet<String> = modalities.into_iter().map(Into::into).collect();

    for (members, label) in GROUPING_RULES {
        if members.iter().all(|m| working.contains(*m)) {
            for member in members.iter() {
                working.remove(*member);
            }
            working.insert(label.to_string());
        }
    }

    working
}

/// Statistics about a validated dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Subject labels, sorted.
    pub subjects: Vec<String>,
    /// Session labels, sorted.
    pub sessions: Vec<String>,
    /// Task labels, sorted.
    pub tasks: Vec<String>,
    /// Modalities after grouping, sorted.
    pub modalities: Vec<String>,
    /// Number of files enumerated.
    pub total_files: usize,
    /// Total size in bytes.
    pub size: u64,
}

impl Summary {
    /// Whether the grouped modalities include field maps.
    pub fn has_fieldmaps(&self) -> bool {
        self.modalities.iter().any(|m| m == "fieldmap")
    }
}

/// Accumulates summary statistics while files are processed.
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    subjects: BTreeSet<String>,
    sessions: BTreeSet<String>,
    tasks: BTreeSet<String>,
    modalities: BTreeSet<String>,
    total_files: usize,
    size: u64,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a file and record its subject and session labels.
    pub fn record_file(&mut self, size: u64, values: &PathValues) {
        self.total_files += 1;
        self.size += size;
        if let Some(subject) = &values.subject {
            self.subjects.insert(subject.clone());
        }
        if let Some(session) = &values.session {
            self.sessions.insert(session.clone());
        }
    }

    /// Record the task and modality of a valid NIfTI image.
    pub fn record_nifti(&mut self, values: &PathValues) {
        if let Some(task) = &values.task {
            self.tasks.insert(task.clone());
        }
        if let Some(modality) = &values.modality {
            self.modalities.insert(modality.clone());
        }
    }

    /// Modality suffixes seen so far, before grouping.
    pub fn modalities(&self) -> &BTreeSet<String> {
        &self.modalities
    }

    pub fn finish(self) -> Summary {
        Summary {
            subjects: self.subjects.into_iter().collect(),
            sessions: self.sessions.into_iter().collect(),
            tasks: self.tasks.into_iter().collect(),
            modalities: group_modalities(self.modalities).into_iter().collect(),
            total_files: self.total_files,
            size: self.size,
        }
    }
}
