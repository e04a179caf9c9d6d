// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sweep-line partitioning of a buffer into render segments.
//!
//! Every highlighting view ends up here. The chunk view, the answer view,
//! and the context view each bring one or more named span collections
//! (chunks, overlap regions, hallucinations, retrieved chunks) and want the
//! text cut into pieces that can each be styled by one rule: "these span ids
//! cover this piece".
//!
//! # Algorithm
//!
//! ```text
//! buffer:   |----------------------------------------|  N
//! spans:       [=====A=====)
//!                    [=======B=======)
//! cuts:     0  3     9     15        25              N
//! segments: [ ][  A  ][A,B ][   B    ][              ]
//! ```
//!
//! 1. Validate spans; skip inverted, out-of-range, and duplicate ids.
//! 2. Cut at `0`, `N`, and every accepted span's start and end.
//! 3. Each pair of consecutive cuts is a segment; its active set is every
//!    span covering the whole pair. One sweep over the index keeps that set
//!    up to date as the cuts go by, so no segment rescans the spans.
//!
//! **Invariant**: segments tile `[0, N)` with no gaps and no overlaps, and
//! their concatenated text is the buffer.
//!
//! **Verified by**: `prop_segments_tile_buffer` (tests/property/tiling.rs)

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;
use crate::index::IntervalIndex;
use crate::types::{RenderSegment, Span, SpanId, TextBuffer};
use crate::verify::contracts::{check_partition_tiles, check_segments_canonical};

/// A named group of spans. The name is for logs and lookups; span ids carry
/// their own collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanCollection {
    pub name: String,
    pub spans: Vec<Span>,
}

impl SpanCollection {
    pub fn new(name: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            name: name.into(),
            spans,
        }
    }
}

/// Partition output: the segments, what was skipped, and the spans that
/// made it in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub segments: Vec<RenderSegment>,
    pub skipped: Vec<MalformedInput>,
    /// Accepted spans, in input order. Metadata lookups go through here.
    pub spans: Vec<Span>,
}

impl Partition {
    /// Metadata for an active id.
    pub fn span(&self, id: &SpanId) -> Option<&Span> {
        self.spans.iter().find(|s| &s.id == id)
    }

    /// Segments where some span of `collection` is active.
    pub fn segments_in<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a RenderSegment> {
        self.segments
            .iter()
            .filter(move |s| s.has_collection(collection))
    }
}

/// Cut `buffer` into segments by every span in `collections`.
///
/// No spans gives a single segment covering the buffer. An empty buffer
/// gives no segments. Zero-width spans are accepted but never active.
pub fn partition(buffer: &TextBuffer, collections: &[SpanCollection]) -> Partition {
    let len = buffer.len();
    let (spans, skipped) = accept_spans(len, collections);

    let index = IntervalIndex::build(spans.iter().filter(|s| !s.is_empty()));

    let mut cuts: Vec<usize> = Vec::with_capacity(index.boundary_positions().len() + 2);
    cuts.push(0);
    cuts.extend_from_slice(index.boundary_positions());
    cuts.push(len);
    cuts.sort_unstable();
    cuts.dedup();

    let mut sweep = index.sweep();
    let segments: Vec<RenderSegment> = cuts
        .windows(2)
        .filter(|pair| pair[0] < pair[1])
        .map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let active_span_ids: BTreeSet<SpanId> = sweep
                .advance_to(start)
                .into_iter()
                .map(|s| s.id.clone())
                .collect();
            RenderSegment {
                start,
                end,
                text: buffer.slice_clamped(start, end).to_string(),
                active_span_ids,
            }
        })
        .collect();

    tracing::debug!(
        collections = collections.len(),
        spans = spans.len(),
        skipped = skipped.len(),
        segments = segments.len(),
        "partitioned buffer"
    );
    check_partition_tiles(buffer, &segments);
    check_segments_canonical(&segments);

    Partition {
        segments,
        skipped,
        spans,
    }
}

/// Step 1: keep spans that fit the buffer, first occurrence of each id wins.
fn accept_spans(len: usize, collections: &[SpanCollection]) -> (Vec<Span>, Vec<MalformedInput>) {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();
    let mut seen: HashSet<&SpanId> = HashSet::new();

    for collection in collections {
        for span in &collection.spans {
            let id = span.id.to_string();
            let problem = if !span.is_well_formed() {
                Some(MalformedInput::InvertedSpan {
                    id,
                    start: span.start,
                    end: span.end,
                })
            } else if span.end > len {
                Some(MalformedInput::OutOfBounds {
                    id,
                    start: span.start,
                    end: span.end,
                    len,
                })
            } else if !seen.insert(&span.id) {
                Some(MalformedInput::DuplicateSpanId { id })
            } else {
                None
            };

            match problem {
                Some(skip) => {
                    tracing::warn!(collection = %collection.name, %skip, "skipping span");
                    skipped.push(skip);
                }
                None => accepted.push(span.clone()),
            }
        }
    }
    (accepted, skipped)
}
