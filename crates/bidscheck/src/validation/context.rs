//! Run-scoped validation state.

use std::collections::{BTreeSet, HashMap};

use crate::input::{FileRef, NiftiHeader};

use super::content::{JsonObject, NiftiContext, Parsed};
use super::issue::Issue;

/// State built during one validation run.
///
/// The first phase fills the lookup maps; the second phase reads them. A
/// context is owned by exactly one run and dropped once the report exists.
#[derive(Debug, Default)]
pub struct ValidationContext {
    /// Every issue found so far, in no particular order.
    pub issues: Vec<Issue>,
    /// Parsed JSON sidecars by relative path.
    pub json_by_path: HashMap<String, JsonObject>,
    /// Raw `.bval`/`.bvec` contents by relative path.
    pub bfile_by_path: HashMap<String, String>,
    /// Valid NIfTI images awaiting the second phase.
    pub niftis: Vec<FileRef>,
    /// Relative paths of valid events files.
    pub event_paths: BTreeSet<String>,
    /// Successfully decoded NIfTI headers.
    pub headers: Vec<(FileRef, NiftiHeader)>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store something a content validator extracted from `path`.
    ///
    /// Each path is written by exactly one file, so keys never collide.
    pub fn store(&mut self, path: &str, parsed: Parsed) {
        match parsed {
            Parsed::Json(object) => {
                self.json_by_path.insert(path.to_string(), object);
            }
            Parsed::BFile(contents) => {
                self.bfile_by_path.insert(path.to_string(), contents);
            }
        }
    }

    /// Lookups handed to the NIfTI validator.
    pub fn nifti_context<'a>(&'a self, files: &'a [FileRef]) -> NiftiContext<'a> {
        NiftiContext::new(&self.json_by_path, &self.bfile_by_path, files, &self.event_paths)
    }
}
