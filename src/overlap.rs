// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Overlaps, discontinuities, and chunk statistics.
//!
//! Chunkers with a configured overlap repeat the tail of one chunk at the
//! head of the next. This module finds those shared regions, flags adjacent
//! chunks whose similarity collapses (a sign the chunker cut through a
//! topic), and summarizes how the chunks cover the document.
//!
//! **Invariants**:
//! - Only positionally adjacent chunks are compared (`B.index = A.index + 1`).
//! - Overlaps and discontinuities come out in ascending chunk index, and no
//!   pair is evaluated twice.
//!
//! **Verified by**: `prop_overlaps_are_inside_both_chunks`
//! (tests/property/overlap_props.rs)

use serde::{Deserialize, Serialize};

use crate::matrix::SimilarityMatrix;
use crate::types::{ChunkSpan, Discontinuity, OverlapRegion, Severity, TextBuffer};
use crate::verify::contracts::check_overlaps_ordered;

// =============================================================================
// SEVERITY THRESHOLDS
// =============================================================================

/// Default upper bound (exclusive) for a `high` discontinuity.
pub const DEFAULT_HIGH_BELOW: f64 = 0.2;

/// Default upper bound (exclusive) for a `medium` discontinuity.
pub const DEFAULT_MEDIUM_BELOW: f64 = 0.4;

/// Similarity cut-offs for discontinuity severity.
///
/// `value < high_below` is `high`, `value < medium_below` is `medium`,
/// anything else is fine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub high_below: f64,
    pub medium_below: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            high_below: DEFAULT_HIGH_BELOW,
            medium_below: DEFAULT_MEDIUM_BELOW,
        }
    }
}

impl SeverityThresholds {
    /// Severity of an adjacent-chunk similarity, or `None` if it's fine.
    pub fn classify(&self, similarity: f64) -> Option<Severity> {
        if similarity < self.high_below {
            Some(Severity::High)
        } else if similarity < self.medium_below {
            Some(Severity::Medium)
        } else {
            None
        }
    }
}

// =============================================================================
// OVERLAP RESOLUTION
// =============================================================================

/// Find the text shared by each pair of consecutive chunks.
///
/// Chunks are visited in `index` order (input order breaks ties). A pair produces a region only when
/// the chunks are positionally adjacent and `B.start < A.end`; the region is
/// `[B.start, min(A.end, B.end))` and must be non-empty. Region text is taken
/// from `buffer`, clamped to its length.
pub fn resolve_overlaps(buffer: &TextBuffer, chunks: &[ChunkSpan]) -> Vec<OverlapRegion> {
    let mut ordered: Vec<&ChunkSpan> = chunks.iter().collect();
    ordered.sort_by_key(|c| c.index);

    let overlaps: Vec<OverlapRegion> = ordered
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            if b.index != a.index + 1 || b.start >= a.end {
                return None;
            }
            let start = b.start;
            let end = a.end.min(b.end);
            if end <= start {
                return None;
            }
            Some(OverlapRegion {
                chunk_a_id: a.id.clone(),
                chunk_b_id: b.id.clone(),
                chunk_a_index: a.index,
                start,
                end,
                text: buffer.slice_clamped(start, end).to_string(),
            })
        })
        .collect();

    tracing::debug!(
        chunks = chunks.len(),
        overlaps = overlaps.len(),
        "resolved chunk overlaps"
    );
    check_overlaps_ordered(&overlaps);
    overlaps
}

/// Flag adjacent chunks with low similarity.
///
/// Walks `M[i][i+1]` for `i` in `0..n-1`. Missing cells (skipped as
/// malformed when the matrix was built) are passed over. `chunk_ids`, when
/// it has an entry for a position, fills in the chunk ids.
pub fn find_discontinuities(
    matrix: &SimilarityMatrix,
    chunk_ids: &[String],
    thresholds: &SeverityThresholds,
) -> Vec<Discontinuity> {
    let n = matrix.size();
    (0..n.saturating_sub(1))
        .filter_map(|i| {
            let similarity = matrix.get(i, i + 1)?;
            let severity = thresholds.classify(similarity)?;
            Some(Discontinuity {
                chunk_a_index: i,
                chunk_b_index: i + 1,
                chunk_a_id: chunk_ids.get(i).cloned(),
                chunk_b_id: chunk_ids.get(i + 1).cloned(),
                similarity,
                severity,
            })
        })
        .collect()
}

// =============================================================================
// CHUNK STATISTICS
// =============================================================================

/// How the chunks of one document are sized and how well they cover it.
///
/// Sizes are in characters. `coverage` is a percentage of the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkStatistics {
    pub total_chunks: usize,
    pub avg_chunk_size: f64,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub total_overlap_chars: usize,
    pub avg_overlap_size: f64,
    pub coverage: f64,
}

impl ChunkStatistics {
    pub fn compute(buffer: &TextBuffer, chunks: &[ChunkSpan], overlaps: &[OverlapRegion]) -> Self {
        let sizes: Vec<usize> = chunks.iter().map(ChunkSpan::len).collect();
        let total_size: usize = sizes.iter().sum();
        let total_overlap_chars: usize = overlaps.iter().map(OverlapRegion::len).sum();

        Self {
            total_chunks: chunks.len(),
            avg_chunk_size: mean(total_size, sizes.len()),
            min_chunk_size: sizes.iter().copied().min().unwrap_or(0),
            max_chunk_size: sizes.iter().copied().max().unwrap_or(0),
            total_overlap_chars,
            avg_overlap_size: mean(total_overlap_chars, overlaps.len()),
            coverage: coverage_percent(buffer.len(), chunks),
        }
    }
}

fn mean(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Percentage of `[0, len)` covered by the union of chunk ranges.
fn coverage_percent(len: usize, chunks: &[ChunkSpan]) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let mut ranges: Vec<(usize, usize)> = chunks
        .iter()
        .map(|c| (c.start.min(len), c.end.min(len)))
        .filter(|(s, e)| s < e)
        .collect();
    ranges.sort_unstable();

    let mut covered = 0;
    let mut reach = 0;
    for (start, end) in ranges {
        let from = start.max(reach);
        if end > from {
            covered += end - from;
            reach = end;
        }
    }
    covered as f64 / len as f64 * 100.0
}
