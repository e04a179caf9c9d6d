// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the engine's output guarantees.
//!
//! Debug-mode assertions called at the end of each operation. Zero-cost in
//! release builds (`debug_assert!`), but any test that exercises an
//! operation also checks its guarantee.
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function           | Guarantee                                   |
//! |-----------------------------|---------------------------------------------|
//! | `check_partition_tiles`     | Segments tile `[0, N)` and reproduce text   |
//! | `check_segments_canonical`  | Adjacent segments differ in active set      |
//! | `check_located_monotonic`   | Located spans increase and never overlap    |
//! | `check_overlaps_ordered`    | Overlap regions follow chunk order          |
//! | `check_bucket_floors`       | Bucket floors strictly decrease             |

use crate::matrix::BUCKET_FLOORS;
use crate::types::{LocatedSpan, OverlapRegion, RenderSegment, TextBuffer};

use super::types::validate_partition;

// ============================================================================
// COMPILE-TIME ASSERTIONS
// ============================================================================

const _: () = {
    // INVARIANT: every bucket floor is strictly below the previous one, so
    // each value in [0, 1] lands in exactly one bucket.
    let mut i = 1;
    while i < BUCKET_FLOORS.len() {
        assert!(BUCKET_FLOORS[i].0 < BUCKET_FLOORS[i - 1].0);
        i += 1;
    }
};

/// Bucket floors are strictly decreasing and inside the unit interval.
#[inline]
pub fn check_bucket_floors() {
    for pair in BUCKET_FLOORS.windows(2) {
        debug_assert!(
            pair[1].0 < pair[0].0,
            "Contract violation: bucket floor {} not below {}",
            pair[1].0,
            pair[0].0
        );
        debug_assert!(
            pair[1].1 < pair[0].1,
            "Contract violation: bucket {:?} not below {:?}",
            pair[1].1,
            pair[0].1
        );
    }
    debug_assert!(
        BUCKET_FLOORS.iter().all(|(f, _)| (0.0..=1.0).contains(f)),
        "Contract violation: bucket floor outside [0, 1]"
    );
}

// ============================================================================
// PARTITION CONTRACTS
// ============================================================================

/// Segments tile the buffer exactly.
///
/// # Panics (debug builds only)
/// Panics on a gap, an overlap, an empty segment, or text that differs from
/// the buffer.
#[inline]
pub fn check_partition_tiles(buffer: &TextBuffer, segments: &[RenderSegment]) {
    if cfg!(debug_assertions) {
        if let Err(e) = validate_partition(buffer, segments) {
            panic!("Contract violation: partition does not tile buffer - {e}");
        }
    }
}

/// No two adjacent segments carry the same active set.
///
/// A boundary only exists where some span starts or ends, so a boundary
/// with nothing changing means a spurious split.
#[inline]
pub fn check_segments_canonical(segments: &[RenderSegment]) {
    for (i, pair) in segments.windows(2).enumerate() {
        debug_assert!(
            pair[0].active_span_ids != pair[1].active_span_ids,
            "Contract violation: segments {} and {} share an active set at {}",
            i,
            i + 1,
            pair[0].end
        );
    }
}

// ============================================================================
// LOCATOR CONTRACTS
// ============================================================================

/// Located spans are strictly increasing and pairwise disjoint.
///
/// # Panics (debug builds only)
/// Panics if any span starts before the previous one ended.
#[inline]
pub fn check_located_monotonic(spans: &[LocatedSpan]) {
    for (i, pair) in spans.windows(2).enumerate() {
        debug_assert!(
            pair[1].start >= pair[0].end,
            "Contract violation: located span {} [{}, {}) overlaps span {} [{}, {})",
            i + 1,
            pair[1].start,
            pair[1].end,
            i,
            pair[0].start,
            pair[0].end
        );
    }
    for span in spans {
        debug_assert!(
            span.start < span.end,
            "Contract violation: located span [{}, {}) is empty",
            span.start,
            span.end
        );
    }
}

// ============================================================================
// OVERLAP CONTRACTS
// ============================================================================

/// Overlap regions come out in chunk order and are non-empty.
#[inline]
pub fn check_overlaps_ordered(regions: &[OverlapRegion]) {
    for pair in regions.windows(2) {
        debug_assert!(
            pair[0].chunk_a_index < pair[1].chunk_a_index,
            "Contract violation: overlap after chunk {} listed before chunk {}",
            pair[1].chunk_a_index,
            pair[0].chunk_a_index
        );
    }
    for region in regions {
        debug_assert!(
            region.start < region.end,
            "Contract violation: empty overlap region between {} and {}",
            region.chunk_a_id,
            region.chunk_b_id
        );
    }
}
