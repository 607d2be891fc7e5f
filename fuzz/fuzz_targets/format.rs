#![no_main]

use flix::format_source;
use flix::lexer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Only clean sources are formatted; the output must lex to the same token kinds.
        if let Ok(formatted) = format_source(s) {
            let before: Vec<_> = lexer::lex(s).tokens.into_iter().map(|t| t.kind).collect();
            let after: Vec<_> = lexer::lex(&formatted).tokens.into_iter().map(|t| t.kind).collect();
            assert_eq!(before, after);
        }
    }
});
