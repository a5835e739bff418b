// Common test utilities for sip-header
#![allow(dead_code)]

use std::fmt::{Debug, Display};
use std::str::FromStr;

use rvoip_sip_header::{Error, NameAddr, Uri};

// --- Type Construction Helpers ---

/// Parses a string into a Uri, panicking on failure.
pub fn uri(uri_str: &str) -> Uri {
    Uri::from_str(uri_str).unwrap_or_else(|e| panic!("Failed to parse test URI '{}': {:?}", uri_str, e))
}

/// A lazily parsed name-addr over a static string.
pub fn lazy_name_addr(input: &'static str) -> NameAddr {
    NameAddr::from_raw(input)
}

/// An eagerly parsed name-addr, panicking on failure.
pub fn name_addr(input: &str) -> NameAddr {
    NameAddr::from_str(input).unwrap_or_else(|e| panic!("Failed to parse name-addr '{}': {}", input, e))
}

// --- Parser/FromStr Test Helpers ---

/// Asserts that parsing the input string with T::from_str results in a grammar error.
pub fn assert_parse_fails<T>(input: &str)
where
    T: FromStr<Err = Error> + Debug,
{
    match T::from_str(input) {
        Ok(parsed) => panic!("Expected Err, got Ok({:?}) for input: '{}'", parsed, input),
        Err(e) => assert!(e.is_grammar(), "Expected a grammar error for '{}', got {:?}", input, e),
    }
}

/// Asserts that `value` written out and parsed again compares equal.
pub fn assert_display_parses_back<T>(value: &T)
where
    T: FromStr<Err = Error> + Display + PartialEq + Debug,
{
    let text = value.to_string();
    match T::from_str(&text) {
        Ok(parsed) => assert_eq!(&parsed, value, "Display output: '{}'", text),
        Err(e) => panic!("Display output '{}' did not parse back: {}", text, e),
    }
}

/// Route test logs through the test writer; `RUST_LOG=trace` shows the parser.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
