//! Cheap gate run before full validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::FileRef;

static IMAGING_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|/)(?:sub|ses)-[^/]+/(?:anat|func|dwi)/[^/]+\.nii(?:\.gz)?$").unwrap()
});

/// Whether the file list plausibly holds a BIDS dataset.
///
/// True when at least one NIfTI image outside any `derivatives` directory
/// sits directly in an `anat`, `func` or `dwi` folder that is itself directly
/// in a `sub-*` or `ses-*` folder.
pub fn could_be_bids(files: &[FileRef]) -> bool {
    files.iter().any(|file| {
        let path = file.relative_path.as_str();
        !path.split('/').any(|segment| segment == "derivatives") && IMAGING_FILE.is_match(path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> Vec<FileRef> {
        paths.iter().map(|p| FileRef::in_memory(*p, "")).collect()
    }

    #[test]
    fn test_subject_level_image_passes() {
        assert!(could_be_bids(&files(&[
            "/participants.tsv",
            "/sub-01/anat/sub-01_T1w.nii.gz",
        ])));
    }

    #[test]
    fn test_session_level_image_passes() {
        assert!(could_be_bids(&files(&["/sub-01/ses-01/func/sub-01_ses-01_task-rest_bold.nii"])));
    }

    #[test]
    fn test_participants_only_fails() {
        assert!(!could_be_bids(&files(&["/participants.tsv", "/README"])));
    }

    #[test]
    fn test_derivatives_do_not_count() {
        assert!(!could_be_bids(&files(&[
            "/derivatives/fmriprep/sub-01/anat/sub-01_T1w.nii.gz",
        ])));
    }

    #[test]
    fn test_image_must_sit_in_modality_folder() {
        assert!(!could_be_bids(&files(&[
            "/sub-01/sub-01_T1w.nii.gz",
            "/sub-01/fmap/sub-01_phasediff.nii.gz",
            "/sub-01/anat/extra/sub-01_T1w.nii.gz",
            "/sub-01/anat/sub-01_T1w.json",
        ])));
    }
}
