// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for rendered key parsing and key composition

#![no_main]

use entistore_key::{Key, KeyBuilder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing never panics, and a parsed key always renders.
    if let Ok(key) = Key::parse(s) {
        let _ = key.render();
        let _ = key.namespace_name();
    }

    // Arbitrary fragments never panic the builder.
    let mut parts = s.splitn(3, '\n');
    let mut builder = KeyBuilder::new();
    builder
        .with_namespace(parts.next().unwrap_or_default())
        .with_parent_key(parts.next().unwrap_or_default())
        .with_key(parts.next().unwrap_or_default());
    let _ = builder.build_and_reset();
});
