//! Subject completeness check.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::is_bids;
use crate::input::FileRef;
use crate::validation::issue::{Issue, IssueCode};

const SUBJECT_PLACEHOLDER: &str = "sub-<sub>";

/// Flags files that exist for some subjects but not for others.
pub struct SessionValidator;

impl SessionValidator {
    pub fn validate(&self, files: &[FileRef]) -> Vec<Issue> {
        let mut by_subject: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for file in files {
            let path = file.relative_path.as_str();
            let Some(subject) = subject_label(path) else {
                continue;
            };
            if !is_bids(path) {
                continue;
            }
            by_subject
                .entry(subject)
                .or_default()
                .insert(abstract_subject(path, subject));
        }

        if by_subject.len() < 2 {
            return Vec::new();
        }

        let all: BTreeSet<&String> = by_subject.values().flatten().collect();
        let mut issues = Vec::new();
        for (subject, present) in &by_subject {
            for path in all.iter().filter(|p| !present.contains(**p)) {
                let missing = path.replace(SUBJECT_PLACEHOLDER, &format!("sub-{}", subject));
                issues.push(
                    Issue::new(IssueCode::InconsistentSubjects)
                        .with_file(FileRef::missing(missing))
                        .with_reason(format!(
                            "This file is missing for subject sub-{}, but is present for at least one other subject.",
                            subject
                        )),
                );
            }
        }
        issues
    }
}

/// Label of the `/sub-<label>/` directory a path lives in.
fn subject_label(path: &str) -> Option<&str> {
    let first = path.strip_prefix('/')?.split('/').next()?;
    let label = first.strip_prefix("sub-")?;
    (!label.is_empty() && path.len() > first.len() + 1).then_some(label)
}

/// Replace every `sub-<label>` entity of the path with a placeholder.
fn abstract_subject(path: &str, subject: &str) -> String {
    let entity = format!("sub-{}", subject);
    path.split('/')
        .map(|segment| {
            segment
                .split('_')
                .map(|token| if token == entity { SUBJECT_PLACEHOLDER } else { token })
                .collect::<Vec<_>>()
                .join("_")
        })
        .collect::<Vec<_>>()
        .join("/")
}
