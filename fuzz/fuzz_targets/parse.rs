#![no_main]

use flix::parser::{self, Parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Lexing and parsing are total: a tree always comes back, with diagnostics for anything malformed.
        let Parse { root, diagnostics } = parser::parse(s);
        if root.has_error() {
            assert!(!diagnostics.is_empty());
        }
    }
});
