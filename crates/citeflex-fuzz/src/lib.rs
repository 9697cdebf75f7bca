//! Fuzzing library for citeflex.
//!
//! Targets cover the code that sees untrusted text: input detection, URL
//! routing, HTML metadata extraction and request models.
//!
//! # Usage
//!
//! ```bash
//! cd crates/citeflex-fuzz
//! cargo +nightly fuzz run fuzz_page_parse -- -max_total_time=60
//! ```

pub use citeflex::{engines, input, models, router};
