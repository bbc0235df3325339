#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let job = printmeta::parse_gcode("fuzz.gcode", Cursor::new(data))
        .expect("reading from memory cannot fail");
    assert!(!job.filaments.is_empty());
});
