#![no_main]

use interval_trainer::workout::{format_duration, parse_count, parse_duration};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Some(sec) = parse_duration(text) {
            // Anything accepted must survive a format/parse cycle.
            assert_eq!(parse_duration(&format_duration(i64::from(sec))), Some(sec));
        }
        let _ = parse_count(text);
    }
});
