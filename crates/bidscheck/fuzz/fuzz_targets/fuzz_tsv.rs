//! Fuzz target for the TSV validator.

#![no_main]

use libfuzzer_sys::fuzz_target;
use bidscheck::validation::content::TsvValidator;
use bidscheck::FileRef;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(contents) = std::str::from_utf8(data) {
        let file = FileRef::in_memory("/sub-01/func/sub-01_task-a_events.tsv", contents);
        let _ = TsvValidator.check(&file, contents, true);
        let _ = TsvValidator.check(&file, contents, false);
    }
});
