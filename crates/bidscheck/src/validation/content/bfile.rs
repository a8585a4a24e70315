//! Diffusion gradient table validation (`.bval` / `.bvec`).

use crate::input::FileRef;
use crate::validation::issue::{Issue, IssueCode};

use super::{ContentReport, ContentValidator, Parsed};

/// Non-empty rows of a b-file, split on whitespace.
pub fn b_file_rows(contents: &str) -> Vec<Vec<&str>> {
    contents
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect()
}

/// Report the first token that is not a number.
fn non_numeric(file: &FileRef, rows: &[Vec<&str>]) -> Option<Issue> {
    rows.iter().enumerate().find_map(|(i, row)| {
        row.iter().find(|t| t.parse::<f64>().is_err()).map(|token| {
            Issue::for_file(IssueCode::BFileNotNumeric, file)
                .with_line(i + 1)
                .with_evidence(format!("'{}' is not a number", token))
        })
    })
}

/// Validates `.bval` files: a single row of numbers.
pub struct BvalValidator;

impl BvalValidator {
    pub fn check(&self, file: &FileRef, contents: &str) -> Vec<Issue> {
        let rows = b_file_rows(contents);
        let mut issues = Vec::new();

        if rows.len() != 1 {
            issues.push(
                Issue::for_file(IssueCode::BvalMultipleRows, file)
                    .with_evidence(format!("found {} rows", rows.len())),
            );
        }
        issues.extend(non_numeric(file, &rows));

        issues
    }
}

impl ContentValidator for BvalValidator {
    fn validate(&self, file: &FileRef, contents: &str) -> ContentReport {
        ContentReport {
            issues: self.check(file, contents),
            parsed: Some(Parsed::BFile(contents.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "bval_validator"
    }
}

/// Validates `.bvec` files: three rows of numbers of equal length.
pub struct BvecValidator;

impl BvecValidator {
    pub fn check(&self, file: &FileRef, contents: &str) -> Vec<Issue> {
        let rows = b_file_rows(contents);
        let mut issues = Vec::new();

        if rows.len() != 3 {
            issues.push(
                Issue::for_file(IssueCode::BvecNumberRows, file)
                    .with_evidence(format!("found {} rows", rows.len())),
            );
        } else if rows.iter().any(|row| row.len() != rows[0].len()) {
            let lengths: Vec<String> = rows.iter().map(|row| row.len().to_string()).collect();
            issues.push(
                Issue::for_file(IssueCode::BvecNumberRows, file)
                    .with_evidence(format!("rows have {} values", lengths.join(", "))),
            );
        }
        issues.extend(non_numeric(file, &rows));

        issues
    }
}

impl ContentValidator for BvecValidator {
    fn validate(&self, file: &FileRef, contents: &str) -> ContentReport {
        ContentReport {
            issues: self.check(file, contents),
            parsed: Some(Parsed::BFile(contents.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "bvec_validator"
    }
}
