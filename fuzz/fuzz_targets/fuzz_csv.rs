#![no_main]

use libfuzzer_sys::fuzz_target;

use forest_metrics::{compute_plot, io, EngineConfig, Plot};

fuzz_target!(|data: &[u8]| {
    // Loading and computing must fail with an error, never panic.
    if let Ok(records) = io::read_records_from_bytes(data) {
        let plot = Plot::new(400.0, Some(20.0), records);
        let _ = compute_plot(&plot, &EngineConfig::default());
    }
});
