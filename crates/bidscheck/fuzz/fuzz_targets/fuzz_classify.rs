//! Fuzz target for the path grammar.
//!
//! Classification must be total: every path maps to exactly one category
//! and no two grammars accept the same path.

#![no_main]

use libfuzzer_sys::fuzz_target;
use bidscheck::grammar::{classify, matching_categories, path_values, PathCategory};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4_096 {
        return;
    }

    if let Ok(raw) = std::str::from_utf8(data) {
        let path = format!("/{}", raw.trim_start_matches('/'));

        let matches = matching_categories(&path);
        assert!(matches.len() <= 1, "{} matched {:?}", path, matches);
        let category = classify(&path);
        assert_eq!(category, matches.first().copied().unwrap_or(PathCategory::Invalid));

        let _ = path_values(&path);
    }
});
