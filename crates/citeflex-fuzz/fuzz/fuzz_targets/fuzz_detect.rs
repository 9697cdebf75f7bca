#![no_main]

use citeflex::input::{detect, extract_ibid_page};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = detect(text);
        let _ = extract_ibid_page(text);
    }
});
