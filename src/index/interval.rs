// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Interval index over immutable spans.
//!
//! Spans come in from several places in no particular order, and some of
//! them overlap (consecutive chunks share their overlap region on purpose).
//! The index sorts once and then answers two kinds of question:
//!
//! | Query                         | Complexity        |
//! |-------------------------------|-------------------|
//! | `next_boundary_after(pos)`    | O(log b)          |
//! | `is_boundary(pos)`            | O(log b)          |
//! | `spans_covering(pos)`         | O(log n + k)      |
//! | `spans_containing(s, e)`      | O(log n + k)      |
//! | `sweep()` over all cuts       | O(n log n + out)  |
//!
//! where `b` is the number of distinct boundaries and `k` the number of spans
//! starting at or before the position. The point queries rescan from the
//! front, so walking every segment of a buffer goes through `sweep`, which
//! visits each span twice (once on entry, once on exit).
//!
//! **Ordering**: `start` ascending, then `end` ascending, then input order.
//! The last key makes the order total, so two runs over the same input give
//! the same answers.

use std::collections::BTreeSet;

use crate::types::Span;

/// Spans sorted for containment and boundary queries.
///
/// Borrows the spans; building an index never copies span metadata.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex<'a> {
    /// Sorted by `(start, end, input order)`.
    spans: Vec<&'a Span>,
    /// Positions into `spans`, ordered by `end`.
    by_end: Vec<usize>,
    /// Every distinct `start` and `end`, ascending.
    boundaries: Vec<usize>,
}

impl<'a> IntervalIndex<'a> {
    /// Build an index. Empty input gives an empty index.
    pub fn build<I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a Span>,
    {
        let mut indexed: Vec<(usize, &'a Span)> = spans.into_iter().enumerate().collect();
        indexed.sort_by_key(|&(order, span)| (span.start, span.end, order));
        let spans: Vec<&'a Span> = indexed.into_iter().map(|(_, span)| span).collect();

        let mut boundaries: Vec<usize> = spans.iter().flat_map(|s| [s.start, s.end]).collect();
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut by_end: Vec<usize> = (0..spans.len()).collect();
        by_end.sort_by_key(|&i| (spans[i].end, i));

        Self {
            spans,
            by_end,
            boundaries,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// All spans in index order.
    #[inline]
    pub fn sorted_spans(&self) -> &[&'a Span] {
        &self.spans
    }

    /// Distinct span boundaries, ascending.
    #[inline]
    pub fn boundary_positions(&self) -> &[usize] {
        &self.boundaries
    }

    /// Is `pos` the start or end of some span?
    pub fn is_boundary(&self, pos: usize) -> bool {
        self.boundaries.binary_search(&pos).is_ok()
    }

    /// Smallest boundary strictly greater than `pos`.
    pub fn next_boundary_after(&self, pos: usize) -> Option<usize> {
        let idx = self.boundaries.partition_point(|&b| b <= pos);
        self.boundaries.get(idx).copied()
    }

    /// Spans with `start ≤ pos < end`, in index order.
    ///
    /// Zero-width spans never cover anything.
    pub fn spans_covering(&self, pos: usize) -> Vec<&'a Span> {
        let candidates = self.spans.partition_point(|s| s.start <= pos);
        self.spans[..candidates]
            .iter()
            .filter(|s| s.contains(pos))
            .copied()
            .collect()
    }

    /// Spans with `start ≤ from AND end ≥ to`, in index order.
    ///
    /// For `from < to` this is exactly the partition membership test.
    pub fn spans_containing(&self, from: usize, to: usize) -> Vec<&'a Span> {
        let candidates = self.spans.partition_point(|s| s.start <= from);
        self.spans[..candidates]
            .iter()
            .filter(|s| s.end >= to)
            .copied()
            .collect()
    }

    /// Start a left-to-right sweep at position 0.
    pub fn sweep(&self) -> Sweep<'_, 'a> {
        Sweep {
            index: self,
            next_start: 0,
            next_end: 0,
            position: 0,
            active: BTreeSet::new(),
        }
    }
}

/// Sweep line over an `IntervalIndex`.
///
/// Positions must be visited in non-decreasing order. At each position the
/// spans that start there enter the active set and the spans that end there
/// leave it, so a full pass costs O(n log n) plus the size of the output.
#[derive(Debug)]
pub struct Sweep<'i, 'a> {
    index: &'i IntervalIndex<'a>,
    /// Next entry of `index.spans` not yet entered.
    next_start: usize,
    /// Next entry of `index.by_end` not yet removed.
    next_end: usize,
    position: usize,
    /// Positions into `index.spans`, so iteration follows index order.
    active: BTreeSet<usize>,
}

impl<'i, 'a> Sweep<'i, 'a> {
    /// Spans with `start ≤ pos < end`, in index order.
    ///
    /// When `pos` and the next position visited are consecutive boundaries,
    /// these are exactly the spans containing the range between them.
    pub fn advance_to(&mut self, pos: usize) -> Vec<&'a Span> {
        debug_assert!(
            pos >= self.position,
            "sweep moved backwards from {} to {}",
            self.position,
            pos
        );
        self.position = pos;

        let spans = &self.index.spans;
        while self.next_start < spans.len() && spans[self.next_start].start <= pos {
            self.active.insert(self.next_start);
            self.next_start += 1;
        }
        let by_end = &self.index.by_end;
        while self.next_end < by_end.len() && spans[by_end[self.next_end]].end <= pos {
            self.active.remove(&by_end[self.next_end]);
            self.next_end += 1;
        }

        self.active.iter().map(|&i| spans[i]).collect()
    }
}
