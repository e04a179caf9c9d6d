// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the sweep-line partitioner.
//!
//! Spans here are raw fuzzer bytes: inverted, past the end, duplicated,
//! zero-width. Whatever comes in, the segments must tile the buffer and every
//! bad span must be reported rather than silently dropped.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

use chunklens::{partition, validate_partition, Span, SpanCollection, SpanId, TextBuffer};

#[derive(Debug, Arbitrary)]
struct PartitionInput {
    text: String,
    /// (collection selector, key, start, end)
    spans: Vec<(u8, u8, u16, u16)>,
}

const COLLECTIONS: [&str; 3] = ["chunk", "overlap", "hallucination"];

/// Tests critical invariants:
/// - INVARIANT 1: Segments tile [0, N) and their text is the buffer
/// - INVARIANT 2: accepted + skipped == total spans
/// - INVARIANT 3: Active ids belong to accepted, non-empty spans
/// - INVARIANT 4: No two adjacent segments share an active set
fuzz_target!(|input: PartitionInput| {
    let buffer = TextBuffer::new(input.text.as_str());
    let spans: Vec<(usize, Span)> = input
        .spans
        .iter()
        .take(64)
        .map(|&(which, key, start, end)| {
            let which = which as usize % COLLECTIONS.len();
            let id = SpanId::new(COLLECTIONS[which], (key % 16).to_string());
            (which, Span::new(id, start as usize % 300, end as usize % 300))
        })
        .collect();
    let collections: Vec<SpanCollection> = COLLECTIONS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            SpanCollection::new(
                *name,
                spans.iter().filter(|(w, _)| *w == i).map(|(_, s)| s.clone()).collect(),
            )
        })
        .collect();

    let result = partition(&buffer, &collections);

    // INVARIANT 1
    if let Err(e) = validate_partition(&buffer, &result.segments) {
        panic!("partition does not tile {:?}: {}", input.text, e);
    }

    // INVARIANT 2
    assert_eq!(
        result.spans.len() + result.skipped.len(),
        spans.len(),
        "spans lost without a skip reason"
    );

    // INVARIANT 3
    let live: HashSet<&SpanId> = result
        .spans
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| &s.id)
        .collect();
    for segment in &result.segments {
        for id in &segment.active_span_ids {
            assert!(live.contains(id), "segment has unknown active id {}", id);
        }
    }

    // INVARIANT 4
    for pair in result.segments.windows(2) {
        assert_ne!(
            pair[0].active_span_ids, pair[1].active_span_ids,
            "segments [{}, {}) and [{}, {}) should have been one",
            pair[0].start, pair[0].end, pair[1].start, pair[1].end
        );
    }
});
