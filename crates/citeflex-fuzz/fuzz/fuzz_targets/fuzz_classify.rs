#![no_main]

use citeflex::router::{UrlRouter, dispatch};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let router = UrlRouter::new();
    if let Ok(route) = router.classify(raw) {
        assert_eq!(route.engine, dispatch(route.url_type));
    }
});
