#![no_main]

use interval_trainer::library::{decode, encode};
use libfuzzer_sys::fuzz_target;

const MAX_PHASES: usize = 1000;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        let defs = decode(json, MAX_PHASES);
        // Whatever survives decoding re-encodes and decodes to the same list.
        if let Ok(again) = encode(&defs) {
            assert_eq!(decode(&again, MAX_PHASES), defs);
        }
    }
});
