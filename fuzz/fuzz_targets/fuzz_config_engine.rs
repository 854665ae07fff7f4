//! Fuzz target for engine configuration parsing.
//!
//! JSON configuration parsing and validation must handle arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Parsing may fail, validation may reject; neither may panic.
        if let Ok(config) = elig_config::EngineConfig::from_str(text) {
            let _ = elig_config::validate_engine_config(&config);
        }
    }
});
