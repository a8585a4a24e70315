//! JSON sidecar validation.

use serde_json::Value;

use crate::input::FileRef;
use crate::validation::issue::{Issue, IssueCode};

use super::{ContentReport, ContentValidator, JsonObject, Parsed};

/// Parses `.json` files. Valid objects are kept for sidecar lookups.
pub struct JsonValidator;

impl JsonValidator {
    /// Parse a sidecar, returning its issues and the object when valid.
    pub fn check(&self, file: &FileRef, contents: &str) -> (Vec<Issue>, Option<JsonObject>) {
        match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(object)) => (Vec::new(), Some(object)),
            Ok(other) => {
                let found = match other {
                    Value::Array(_) => "an array",
                    Value::String(_) => "a string",
                    Value::Number(_) => "a number",
                    Value::Bool(_) => "a boolean",
                    _ => "null",
                };
                let issue = Issue::for_file(IssueCode::JsonInvalid, file)
                    .with_evidence(format!("top-level value must be an object, found {}", found));
                (vec![issue], None)
            }
            Err(e) => {
                let issue = Issue::for_file(IssueCode::JsonInvalid, file)
                    .with_line(e.line())
                    .with_evidence(e.to_string());
                (vec![issue], None)
            }
        }
    }
}

impl ContentValidator for JsonValidator {
    fn validate(&self, file: &FileRef, contents: &str) -> ContentReport {
        let (issues, object) = self.check(file, contents);
        ContentReport {
            issues,
            parsed: object.map(Parsed::Json),
        }
    }

    fn name(&self) -> &'static str {
        "json_validator"
    }
}
