//! Tab-separated table validation.

use crate::input::FileRef;
use crate::validation::issue::{Issue, IssueCode};

use super::{ContentReport, ContentValidator};

/// Cell values that look like missing data but are not `n/a`.
const IMPROPER_NA: &[&str] = &["NA", "N/A", "na", "nan", "NaN"];

/// Validates `.tsv` files: rectangular rows, no empty cells, `n/a` for
/// missing values, and the `onset`/`duration` columns of events files.
pub struct TsvValidator;

impl TsvValidator {
    /// Check a table. `is_events` enables the events column rules.
    pub fn check(&self, file: &FileRef, contents: &str, is_events: bool) -> Vec<Issue> {
        let mut issues = Vec::new();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(contents.as_bytes());

        let mut headers: Option<Vec<String>> = None;

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    issues.push(Issue::for_file(IssueCode::FileRead, file).with_evidence(e.to_string()));
                    break;
                }
            };
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

            let Some(header) = headers.as_ref() else {
                headers = Some(record.iter().map(|s| s.to_string()).collect());
                continue;
            };

            if record.len() != header.len() {
                issues.push(
                    Issue::for_file(IssueCode::TsvEqualRows, file)
                        .with_line(line)
                        .with_evidence(format!(
                            "row has {} columns, header has {}",
                            record.len(),
                            header.len()
                        )),
                );
            }

            for (column, value) in record.iter().enumerate() {
                let column_name = header.get(column).map(String::as_str).unwrap_or("?");
                if value.trim().is_empty() {
                    issues.push(
                        Issue::for_file(IssueCode::TsvEmptyCell, file)
                            .with_line(line)
                            .with_evidence(format!("empty value in column '{}'", column_name)),
                    );
                } else if IMPROPER_NA.contains(&value.trim()) {
                    issues.push(
                        Issue::for_file(IssueCode::TsvImproperNa, file)
                            .with_line(line)
                            .with_evidence(format!("'{}' in column '{}'", value, column_name)),
                    );
                }
            }
        }

        if is_events {
            let header = headers.unwrap_or_default();
            if header.first().map(String::as_str) != Some("onset") {
                issues.push(
                    Issue::for_file(IssueCode::EventsColumnOnset, file)
                        .with_line(1)
                        .with_evidence(header.join("\t")),
                );
            }
            if header.get(1).map(String::as_str) != Some("duration") {
                issues.push(
                    Issue::for_file(IssueCode::EventsColumnDuration, file)
                        .with_line(1)
                        .with_evidence(header.join("\t")),
                );
            }
        }

        issues
    }
}

impl ContentValidator for TsvValidator {
    fn validate(&self, file: &FileRef, contents: &str) -> ContentReport {
        let is_events = file.name.ends_with("_events.tsv");
        ContentReport::issues(self.check(file, contents, is_events))
    }

    fn name(&self) -> &'static str {
        "tsv_validator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(path: &str, contents: &str) -> Vec<Issue> {
        let file = FileRef::in_memory(path, contents);
        TsvValidator.validate(&file, contents).issues
    }

    fn codes(issues: &[Issue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_clean_participants_file() {
        let issues = check("/participants.tsv", "participant_id\tage\nsub-01\t34\nsub-02\tn/a\n");
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_row_width_mismatch() {
        let issues = check("/participants.tsv", "participant_id\tage\nsub-01\t34\textra\n");

        assert_eq!(codes(&issues), vec![IssueCode::TsvEqualRows]);
        assert_eq!(issues[0].line, Some(2));
    }

    #[test]
    fn test_empty_cell_and_improper_na() {
        let issues = check("/participants.tsv", "participant_id\tage\tsex\nsub-01\t\tNA\n");
        assert_eq!(codes(&issues), vec![IssueCode::TsvEmptyCell, IssueCode::TsvImproperNa]);
    }

    #[test]
    fn test_events_columns() {
        let good = check(
            "/sub-01/func/sub-01_task-a_events.tsv",
            "onset\tduration\ttrial_type\n0.5\t1\tgo\n",
        );
        assert!(good.is_empty());

        let bad = check(
            "/sub-01/func/sub-01_task-a_events.tsv",
            "duration\tonset\n1\t0.5\n",
        );
        assert_eq!(
            codes(&bad),
            vec![IssueCode::EventsColumnOnset, IssueCode::EventsColumnDuration]
        );
    }

    #[test]
    fn test_empty_events_file() {
        let issues = check("/sub-01/func/sub-01_task-a_events.tsv", "");
        assert_eq!(
            codes(&issues),
            vec![IssueCode::EventsColumnOnset, IssueCode::EventsColumnDuration]
        );
    }

    #[test]
    fn test_column_rules_only_apply_to_events() {
        let issues = check("/sub-01/sub-01_scans.tsv", "filename\tacq_time\nanat/sub-01_T1w.nii.gz\t2020-01-01\n");
        assert!(issues.is_empty());
    }
}
