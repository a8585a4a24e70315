//! Fuzz target for NIfTI header decoding.
//!
//! Arbitrary bytes, gzip-wrapped or not, must decode or fail cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use bidscheck::input::NiftiHeader;
use bidscheck::FileRef;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(header) = NiftiHeader::parse(data) {
        let _ = header.repetition_time();
        let _ = header.volume_count();
        let _ = header.voxel_size();
    }

    let file = FileRef::in_memory("/sub-01/anat/sub-01_T1w.nii.gz", data.to_vec());
    let _ = NiftiHeader::read(&file);
});
