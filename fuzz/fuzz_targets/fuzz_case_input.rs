//! Fuzz target for case input parsing.
//!
//! Case JSON arrives from an external front-end; parsing and post-parse
//! validation must handle arbitrary input without panicking.

#![no_main]

use elig_common::Case;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(case) = serde_json::from_slice::<Case>(data) {
        let _ = case.dimensions.validate();
        for visit in &case.visits {
            let _ = visit.dimensions.validate();
        }
        // Round-trip must stay stable for accepted inputs.
        let _ = serde_json::to_string(&case);
    }
});
