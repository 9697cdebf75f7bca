#![no_main]

use citeflex::engines::PageMeta;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Pages arrive lossily decoded, so any bytes are fair game.
    let html = String::from_utf8_lossy(data);
    let _ = PageMeta::parse(&html);
});
