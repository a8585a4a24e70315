//! Scanning parameter consistency across subjects, sessions and runs.

use std::collections::BTreeMap;

use crate::input::{FileRef, NiftiHeader};
use crate::validation::issue::{Issue, IssueCode};

/// Compares NIfTI headers of files that differ only in their subject,
/// session or run, and flags the ones that deviate from the majority.
pub struct HeaderFieldValidator;

/// Parameters compared within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Dimensions,
    VoxelSize,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Dimensions => "dimensions",
            Field::VoxelSize => "voxel size",
        }
    }

    fn value(&self, header: &NiftiHeader) -> String {
        match self {
            Field::Dimensions => {
                let [x, y, z] = header.spatial_dims();
                format!("{}x{}x{}", x, y, z)
            }
            Field::VoxelSize => {
                let [x, y, z] = header.voxel_size();
                format!("{:.2}x{:.2}x{:.2}", x, y, z)
            }
        }
    }
}

impl HeaderFieldValidator {
    pub fn validate(&self, headers: &[(FileRef, NiftiHeader)]) -> Vec<Issue> {
        let mut groups: BTreeMap<String, Vec<&(FileRef, NiftiHeader)>> = BTreeMap::new();
        for entry in headers {
            groups.entry(group_key(&entry.0.name)).or_default().push(entry);
        }

        let mut issues = Vec::new();
        for members in groups.values().filter(|m| m.len() > 1) {
            for field in [Field::Dimensions, Field::VoxelSize] {
                let values: Vec<String> = members.iter().map(|(_, h)| field.value(h)).collect();
                let expected = most_common(&values);

                for ((file, _), value) in members.iter().zip(&values) {
                    if value != expected {
                        issues.push(Issue::for_file(IssueCode::InconsistentParameters, file).with_evidence(
                            format!(
                                "The most common set of {} is {}, this file has {}",
                                field.label(),
                                expected,
                                value
                            ),
                        ));
                    }
                }
            }
        }
        issues
    }
}

/// File name with the `sub`, `ses` and `run` entities dropped.
fn group_key(name: &str) -> String {
    name.split('_')
        .filter(|e| !(e.starts_with("sub-") || e.starts_with("ses-") || e.starts_with("run-")))
        .collect::<Vec<_>>()
        .join("_")
}

/// Most frequent value; ties go to the smallest.
fn most_common(values: &[String]) -> &str {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value.as_str()).or_default() += 1;
    }
    let mut best = "";
    let mut best_count = 0;
    for (value, count) in counts {
        if count > best_count {
            best = value;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::header_bytes;

    fn entry(path: &str, dims: [i16; 3], voxel: f32) -> (FileRef, NiftiHeader) {
        let bytes = header_bytes(
            [3, dims[0], dims[1], dims[2], 1, 1, 1, 1],
            [1.0, voxel, voxel, voxel, 0.0, 0.0, 0.0, 0.0],
            10,
            false,
        );
        (FileRef::missing(path), NiftiHeader::parse(&bytes).unwrap())
    }

    #[test]
    fn test_group_key() {
        assert_eq!(
            group_key("sub-01_ses-02_task-rest_run-1_bold.nii.gz"),
            "task-rest_bold.nii.gz"
        );
        assert_eq!(group_key("sub-01_T1w.nii"), "T1w.nii");
    }

    #[test]
    fn test_consistent_headers() {
        let headers = vec![
            entry("/sub-01/anat/sub-01_T1w.nii.gz", [176, 256, 256], 1.0),
            entry("/sub-02/anat/sub-02_T1w.nii.gz", [176, 256, 256], 1.0),
        ];
        assert!(HeaderFieldValidator.validate(&headers).is_empty());
    }

    #[test]
    fn test_outlier_is_flagged() {
        let headers = vec![
            entry("/sub-01/anat/sub-01_T1w.nii.gz", [176, 256, 256], 1.0),
            entry("/sub-02/anat/sub-02_T1w.nii.gz", [176, 256, 256], 1.0),
            entry("/sub-03/anat/sub-03_T1w.nii.gz", [160, 256, 256], 1.2),
        ];

        let issues = HeaderFieldValidator.validate(&headers);

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.path() == Some("/sub-03/anat/sub-03_T1w.nii.gz")));
        assert!(issues.iter().all(|i| i.code == IssueCode::InconsistentParameters));
        assert!(issues[0].evidence.as_deref().unwrap().contains("176x256x256"));
        assert!(issues[1].evidence.as_deref().unwrap().contains("1.20x1.20x1.20"));
    }

    #[test]
    fn test_rounding_hides_tiny_differences() {
        let headers = vec![
            entry("/sub-01/anat/sub-01_T1w.nii.gz", [176, 256, 256], 1.0),
            entry("/sub-02/anat/sub-02_T1w.nii.gz", [176, 256, 256], 1.001),
        ];
        assert!(HeaderFieldValidator.validate(&headers).is_empty());
    }

    #[test]
    fn test_different_modalities_are_not_compared() {
        let headers = vec![
            entry("/sub-01/anat/sub-01_T1w.nii.gz", [176, 256, 256], 1.0),
            entry("/sub-01/anat/sub-01_T2w.nii.gz", [80, 128, 128], 2.0),
        ];
        assert!(HeaderFieldValidator.validate(&headers).is_empty());
    }
}
