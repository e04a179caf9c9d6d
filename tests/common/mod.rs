//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chunklens::{validate_partition, RenderSegment, TextBuffer};
use serde::de::DeserializeOwned;

// Re-export canonical test utilities from chunklens::testing
pub use chunklens::testing::{make_annotation, make_chunk, make_chunks, make_retrieved, make_span};

/// Directory holding the JSON payload fixtures.
pub const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(FIXTURES_DIR).join(name)
}

/// Read and parse a fixture. Panics with the file name on failure.
pub fn load_fixture<T: DeserializeOwned>(name: &str) -> T {
    let path = fixture_path(name);
    let json = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("failed to parse fixture {}: {}", name, e))
}

/// Assert that `segments` tile `text`, with a readable failure message.
pub fn assert_tiles(text: &str, segments: &[RenderSegment]) {
    let buffer = TextBuffer::new(text);
    if let Err(e) = validate_partition(&buffer, segments) {
        panic!("segments do not tile {:?}: {}", text, e);
    }
}

/// Texts of the segments where `collection` is active.
pub fn texts_in<'a>(segments: &'a [RenderSegment], collection: &str) -> Vec<&'a str> {
    segments
        .iter()
        .filter(|s| s.has_collection(collection))
        .map(|s| s.text.as_str())
        .collect()
}
