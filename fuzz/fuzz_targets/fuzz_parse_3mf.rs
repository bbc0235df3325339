#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // ZIP opening, model document, settings, manifest, dialects and previews
    let _ = printmeta::parse_3mf("fuzz.3mf", Cursor::new(data));
});
