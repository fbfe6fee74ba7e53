#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use sigfold_parser::lexer::Lexer;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    // Token spans stay in bounds and never go backwards.
    let mut last_end = 0usize;
    for (start, _, end) in Lexer::new(&s) {
        assert!(start <= end && end <= s.len());
        assert!(start >= last_end || start == end);
        last_end = last_end.max(end);
    }

    // Parse, rewrite and print either succeed or return an error.
    let _ = sigfold::format_source(Path::new("fuzz.go"), &s);
});
