// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Type wrappers that make invalid render output unrepresentable.
//!
//! A renderer that receives a `WellFormedPartition` can slice, index, and
//! concatenate without re-checking anything: the tiling was verified once at
//! construction. Same for `MonotonicSpans` and the locator output.
//!
//! | Type                  | What's Guaranteed                                |
//! |-----------------------|--------------------------------------------------|
//! | `WellFormedPartition` | Segments tile `[0, N)` and reproduce the buffer  |
//! | `MonotonicSpans`      | Strictly increasing starts, no overlaps, in range|
//!
//! # Example
//!
//! ```ignore
//! let partition = partition(&buffer, &collections);
//! let checked = WellFormedPartition::new(&buffer, partition.segments)?;
//! for segment in checked.segments() { /* no bounds checks needed */ }
//! ```

use thiserror::Error;

use crate::types::{LocatedSpan, RenderSegment, TextBuffer};

/// Error type for invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// The first segment doesn't start at 0.
    #[error("first segment starts at {start}, expected 0")]
    DoesNotStartAtZero { start: usize },
    /// The last segment doesn't end at the buffer length.
    #[error("last segment ends at {end} but buffer length is {len}")]
    DoesNotReachEnd { end: usize, len: usize },
    /// Two consecutive segments leave a gap or overlap.
    #[error("segment {position} starts at {start} but previous ended at {previous_end}")]
    NotContiguous {
        position: usize,
        start: usize,
        previous_end: usize,
    },
    /// A segment has `start >= end`.
    #[error("segment {position} [{start}, {end}) is empty or inverted")]
    EmptySegment {
        position: usize,
        start: usize,
        end: usize,
    },
    /// A segment's text differs from the buffer at its range.
    #[error("segment {position} text does not match buffer [{start}, {end})")]
    TextMismatch {
        position: usize,
        start: usize,
        end: usize,
    },
    /// Segments exist for an empty buffer.
    #[error("empty buffer produced {count} segments")]
    SegmentsForEmptyBuffer { count: usize },
    /// Located spans are out of order or overlap.
    #[error("located span {position} starts at {start} before previous end {previous_end}")]
    LocatedOverlap {
        position: usize,
        start: usize,
        previous_end: usize,
    },
    /// A located span is empty, inverted, or past the end of the text.
    #[error("located span {position} [{start}, {end}) is not a valid range in length {len}")]
    LocatedOutOfRange {
        position: usize,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Check that `segments` exactly tile `buffer`.
///
/// - empty buffer ⟹ no segments
/// - otherwise: first starts at 0, last ends at N, each starts where the
///   previous ended, none is empty, and each text equals the buffer slice
pub fn validate_partition(
    buffer: &TextBuffer,
    segments: &[RenderSegment],
) -> Result<(), InvariantError> {
    if buffer.is_empty() {
        return match segments.len() {
            0 => Ok(()),
            count => Err(InvariantError::SegmentsForEmptyBuffer { count }),
        };
    }

    let mut previous_end = 0;
    for (position, segment) in segments.iter().enumerate() {
        if position == 0 && segment.start != 0 {
            return Err(InvariantError::DoesNotStartAtZero {
                start: segment.start,
            });
        }
        if position > 0 && segment.start != previous_end {
            return Err(InvariantError::NotContiguous {
                position,
                start: segment.start,
                previous_end,
            });
        }
        if segment.start >= segment.end {
            return Err(InvariantError::EmptySegment {
                position,
                start: segment.start,
                end: segment.end,
            });
        }
        if buffer.slice(segment.start, segment.end) != Some(segment.text.as_str()) {
            return Err(InvariantError::TextMismatch {
                position,
                start: segment.start,
                end: segment.end,
            });
        }
        previous_end = segment.end;
    }

    if previous_end != buffer.len() {
        return Err(InvariantError::DoesNotReachEnd {
            end: previous_end,
            len: buffer.len(),
        });
    }
    Ok(())
}

/// Check that located spans are in range, non-empty, strictly increasing,
/// and pairwise disjoint.
pub fn validate_located(text_len: usize, spans: &[LocatedSpan]) -> Result<(), InvariantError> {
    let mut previous_end: Option<usize> = None;
    for (position, span) in spans.iter().enumerate() {
        if span.start >= span.end || span.end > text_len {
            return Err(InvariantError::LocatedOutOfRange {
                position,
                start: span.start,
                end: span.end,
                len: text_len,
            });
        }
        if let Some(previous_end) = previous_end {
            if span.start < previous_end {
                return Err(InvariantError::LocatedOverlap {
                    position,
                    start: span.start,
                    previous_end,
                });
            }
        }
        previous_end = Some(span.end);
    }
    Ok(())
}

/// Render segments verified to tile their buffer.
#[derive(Debug, Clone)]
pub struct WellFormedPartition {
    segments: Vec<RenderSegment>,
}

impl WellFormedPartition {
    pub fn new(buffer: &TextBuffer, segments: Vec<RenderSegment>) -> Result<Self, InvariantError> {
        validate_partition(buffer, &segments)?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[RenderSegment] {
        &self.segments
    }

    /// Concatenated segment text. Equal to the buffer by construction.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<RenderSegment> {
        self.segments
    }
}

/// Located spans verified to be monotonic and disjoint.
#[derive(Debug, Clone)]
pub struct MonotonicSpans {
    spans: Vec<LocatedSpan>,
}

impl MonotonicSpans {
    pub fn new(text_len: usize, spans: Vec<LocatedSpan>) -> Result<Self, InvariantError> {
        validate_located(text_len, &spans)?;
        Ok(Self { spans })
    }

    pub fn spans(&self) -> &[LocatedSpan] {
        &self.spans
    }

    pub fn into_inner(self) -> Vec<LocatedSpan> {
        self.spans
    }
}
