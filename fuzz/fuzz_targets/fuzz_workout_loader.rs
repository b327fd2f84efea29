#![no_main]

use std::path::Path;

use interval_trainer::config::WorkoutLoader;
use interval_trainer::phase::expand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        let loader = WorkoutLoader::with_defaults();
        // Loaded workouts must also expand without panicking.
        if let Ok(loaded) = loader.load_str(yaml, Path::new("fuzz.yaml")) {
            let _ = expand(&loaded.workout);
        }
    }
});
