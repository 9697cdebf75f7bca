#![no_main]

use citeflex::models::FormatNotesInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = serde_json::from_slice::<FormatNotesInput>(data) {
        let _ = input.validate();
    }
});
