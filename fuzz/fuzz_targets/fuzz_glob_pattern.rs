// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for scan pattern compilation

#![no_main]

use entistore_datastore::GlobPattern;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some((pattern, candidate)) = s.split_once('\n') {
            if let Ok(glob) = GlobPattern::compile(pattern) {
                let _ = glob.matches(candidate);
            }
        }
    }
});
