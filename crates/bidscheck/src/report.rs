//! Issue aggregation and the final validation report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::FileRef;
use crate::summary::Summary;
use crate::validation::{Issue, IssueCode, Severity, ValidatorOptions};

/// One occurrence of an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// File-specific message, when it differs from the group's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl IssueFile {
    /// Relative path of the file, or `""` for dataset-wide issues.
    pub fn path(&self) -> &str {
        self.file.as_ref().map(|f| f.relative_path.as_str()).unwrap_or("")
    }
}

impl From<Issue> for IssueFile {
    fn from(issue: Issue) -> Self {
        Self {
            file: issue.file,
            evidence: issue.evidence,
            reason: issue.reason,
            line: issue.line,
        }
    }
}

/// All occurrences of one issue code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueGroup {
    pub code: u16,
    pub key: String,
    pub severity: Severity,
    pub reason: String,
    /// Occurrences, sorted by relative path.
    pub files: Vec<IssueFile>,
}

impl IssueGroup {
    fn new(code: IssueCode, files: Vec<IssueFile>) -> Self {
        Self {
            code: code.code(),
            key: code.key().to_string(),
            severity: code.severity(),
            reason: code.reason().to_string(),
            files,
        }
    }
}

/// Result of validating a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<IssueGroup>,
    pub warnings: Vec<IssueGroup>,
    pub summary: Summary,
    /// When the report was produced.
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(errors: Vec<IssueGroup>, warnings: Vec<IssueGroup>, summary: Summary) -> Self {
        Self {
            errors,
            warnings,
            summary,
            validated_at: Utc::now(),
        }
    }

    /// Whether the dataset has no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of error occurrences.
    pub fn error_count(&self) -> usize {
        self.errors.iter().map(|g| g.files.len()).sum()
    }

    /// Number of warning occurrences.
    pub fn warning_count(&self) -> usize {
        self.warnings.iter().map(|g| g.files.len()).sum()
    }

    /// Find an error or warning group by numeric code.
    pub fn group(&self, code: u16) -> Option<&IssueGroup> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .find(|g| g.code == code)
    }
}

/// Turns raw issues into sorted error and warning groups.
pub struct IssueAggregator;

impl IssueAggregator {
    /// Group, sort, split by severity and filter.
    ///
    /// Groups come out in ascending code order; files within a group are
    /// sorted by relative path with a stable sort, so the result does not
    /// depend on the order issues were collected in beyond ties.
    pub fn aggregate(
        issues: Vec<Issue>,
        options: &ValidatorOptions,
        summary: &Summary,
    ) -> (Vec<IssueGroup>, Vec<IssueGroup>) {
        let mut by_code: BTreeMap<IssueCode, Vec<IssueFile>> = BTreeMap::new();
        for issue in issues {
            by_code.entry(issue.code).or_default().push(issue.into());
        }

        let (mut errors, mut warnings) = (Vec::new(), Vec::new());
        for (code, mut files) in by_code {
            files.sort_by(|a, b| a.path().cmp(b.path()));
            let group = IssueGroup::new(code, files);
            match group.severity {
                Severity::Error => errors.push(group),
                Severity::Warning => warnings.push(group),
            }
        }

        if options.ignore_warnings {
            warnings.clear();
        }
        if !summary.has_fieldmaps() {
            warnings.retain(|g| {
                IssueCode::from_code(g.code).is_none_or(|code| !code.is_fieldmap_related())
            });
        }

        (errors, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(code: IssueCode, path: &str) -> Issue {
        Issue::for_file(code, &FileRef::missing(path))
    }

    fn summary_with(modalities: &[&str]) -> Summary {
        Summary {
            modalities: modalities.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_sorted_by_path() {
        let issues = vec![
            issue(IssueCode::NotIncluded, "/sub-02/x"),
            issue(IssueCode::JsonInvalid, "/b.json"),
            issue(IssueCode::NotIncluded, "/sub-01/x"),
            issue(IssueCode::NotIncluded, "/a"),
        ];

        let (errors, warnings) =
            IssueAggregator::aggregate(issues, &ValidatorOptions::default(), &Summary::default());

        assert!(warnings.is_empty());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, 1);
        assert_eq!(errors[0].key, "NOT_INCLUDED");
        let paths: Vec<&str> = errors[0].files.iter().map(|f| f.path()).collect();
        assert_eq!(paths, vec!["/a", "/sub-01/x", "/sub-02/x"]);
        assert_eq!(errors[1].code, 27);
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let issues = vec![
            issue(IssueCode::TsvEmptyCell, "/participants.tsv").with_line(3),
            issue(IssueCode::TsvEmptyCell, "/participants.tsv").with_line(2),
        ];

        let (errors, _) =
            IssueAggregator::aggregate(issues, &ValidatorOptions::default(), &Summary::default());

        let lines: Vec<Option<usize>> = errors[0].files.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_severity_split_and_ignore_warnings() {
        let issues = vec![
            issue(IssueCode::TsvImproperNa, "/participants.tsv"),
            issue(IssueCode::TsvEqualRows, "/participants.tsv"),
        ];

        let (errors, warnings) = IssueAggregator::aggregate(
            issues.clone(),
            &ValidatorOptions::default(),
            &Summary::default(),
        );
        assert_eq!(errors[0].code, 22);
        assert_eq!(warnings[0].code, 24);

        let options = ValidatorOptions::default().with_ignore_warnings(true);
        let (errors, warnings) = IssueAggregator::aggregate(issues, &options, &Summary::default());
        assert_eq!(errors.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fieldmap_warnings_need_fieldmaps() {
        let bold = "/sub-01/func/sub-01_task-rest_bold.nii.gz";
        let issues = vec![
            issue(IssueCode::EchoTimeNotDefined, bold),
            issue(IssueCode::TotalReadoutTimeNotDefined, bold),
            issue(IssueCode::SliceTimingNotDefined, bold),
        ];

        let (_, warnings) = IssueAggregator::aggregate(
            issues.clone(),
            &ValidatorOptions::default(),
            &summary_with(&["bold"]),
        );
        let codes: Vec<u16> = warnings.iter().map(|g| g.code).collect();
        assert_eq!(codes, vec![13]);

        let (_, warnings) = IssueAggregator::aggregate(
            issues,
            &ValidatorOptions::default(),
            &summary_with(&["bold", "fieldmap"]),
        );
        let codes: Vec<u16> = warnings.iter().map(|g| g.code).collect();
        assert_eq!(codes, vec![6, 9, 13]);
    }

    #[test]
    fn test_report_counts() {
        let issues = vec![
            issue(IssueCode::NotIncluded, "/a"),
            issue(IssueCode::NotIncluded, "/b"),
            issue(IssueCode::TsvImproperNa, "/participants.tsv"),
        ];
        let (errors, warnings) =
            IssueAggregator::aggregate(issues, &ValidatorOptions::default(), &Summary::default());
        let report = ValidationReport::new(errors, warnings, Summary::default());

        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.group(24).map(|g| g.files.len()), Some(1));
        assert!(report.group(99).is_none());
    }
}
