//! Sidecar inheritance.
//!
//! Metadata for a data file may live at several levels of the tree: the
//! dataset root (no `sub`, `ses` or `run` entities), the subject folder, the
//! session folder, and next to the file. More specific levels override more
//! general ones.

use std::collections::HashMap;

use super::JsonObject;

/// Candidate companion paths for `path`, most general first.
///
/// The file's suffix is replaced by `suffix` and its extension by
/// `extension`; e.g. the events files of a bold run are
/// `inheritance_chain(path, "events", ".tsv")`.
pub fn inheritance_chain(path: &str, suffix: &str, extension: &str) -> Vec<String> {
    let (directory, name) = path.rsplit_once('/').unwrap_or(("", path));
    let stem = name.split('.').next().unwrap_or(name);

    let mut entities: Vec<&str> = stem.split('_').collect();
    if entities.len() > 1 {
        entities.pop();
    } else {
        entities.clear();
    }

    let subject = entities.iter().find(|e| e.starts_with("sub-")).copied();
    let session = entities.iter().find(|e| e.starts_with("ses-")).copied();

    let file_name = |keep: &dyn Fn(&str) -> bool| {
        let mut parts: Vec<&str> = entities.iter().copied().filter(|e| keep(e)).collect();
        parts.push(suffix);
        format!("{}{}", parts.join("_"), extension)
    };
    let not_run = |e: &str| !e.starts_with("run-");

    let mut chain = vec![format!(
        "/{}",
        file_name(&|e| not_run(e) && !e.starts_with("sub-") && !e.starts_with("ses-"))
    )];
    if let Some(subject) = subject {
        chain.push(format!(
            "/{}/{}",
            subject,
            file_name(&|e| not_run(e) && !e.starts_with("ses-"))
        ));
        if let Some(session) = session {
            chain.push(format!("/{}/{}/{}", subject, session, file_name(&not_run)));
        }
    }
    chain.push(format!("{}/{}", directory, file_name(&|_| true)));

    let mut unique = Vec::with_capacity(chain.len());
    for candidate in chain {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Merge every sidecar along the inheritance chain of a data file.
pub fn merged_sidecar(path: &str, suffix: &str, json_by_path: &HashMap<String, JsonObject>) -> JsonObject {
    let mut merged = JsonObject::new();
    for candidate in inheritance_chain(path, suffix, ".json") {
        if let Some(object) = json_by_path.get(&candidate) {
            for (key, value) in object {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_chain_for_session_bold() {
        let chain = inheritance_chain(
            "/sub-01/ses-02/func/sub-01_ses-02_task-rest_run-1_bold.nii.gz",
            "bold",
            ".json",
        );

        assert_eq!(
            chain,
            vec![
                "/task-rest_bold.json",
                "/sub-01/sub-01_task-rest_bold.json",
                "/sub-01/ses-02/sub-01_ses-02_task-rest_bold.json",
                "/sub-01/ses-02/func/sub-01_ses-02_task-rest_run-1_bold.json",
            ]
        );
    }

    #[test]
    fn test_chain_replaces_suffix() {
        let chain = inheritance_chain("/sub-01/func/sub-01_task-rest_bold.nii", "events", ".tsv");
        assert_eq!(
            chain,
            vec![
                "/task-rest_events.tsv",
                "/sub-01/sub-01_task-rest_events.tsv",
                "/sub-01/func/sub-01_task-rest_events.tsv",
            ]
        );
    }

    #[test]
    fn test_chain_for_entityless_suffix() {
        let chain = inheritance_chain("/sub-01/dwi/sub-01_dwi.nii.gz", "dwi", ".bval");
        assert_eq!(
            chain,
            vec!["/dwi.bval", "/sub-01/sub-01_dwi.bval", "/sub-01/dwi/sub-01_dwi.bval"]
        );
    }

    #[test]
    fn test_specific_sidecar_overrides_general() {
        let mut json_by_path = HashMap::new();
        json_by_path.insert(
            "/task-rest_bold.json".to_string(),
            object(json!({"RepetitionTime": 2.0, "EchoTime": 0.03})),
        );
        json_by_path.insert(
            "/sub-01/func/sub-01_task-rest_bold.json".to_string(),
            object(json!({"RepetitionTime": 1.5})),
        );

        let merged = merged_sidecar("/sub-01/func/sub-01_task-rest_bold.nii.gz", "bold", &json_by_path);

        assert_eq!(merged["RepetitionTime"].as_f64(), Some(1.5));
        assert_eq!(merged["EchoTime"].as_f64(), Some(0.03));
    }
}
