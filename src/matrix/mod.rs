// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Similarity matrices: validation, statistics, and display buckets.
//!
//! The service sends an `n × n` matrix of cosine similarities between the
//! chunks of a document, indexed by chunk position. This module checks the
//! cells, caps what gets displayed, and produces a report with aggregate
//! statistics and a bucket per displayed cell.
//!
//! # Display cap
//!
//! Heatmaps stop being readable past a few dozen rows, so by default only
//! the leading `20 × 20` submatrix is reported. Statistics and buckets are
//! computed over that same submatrix, so the numbers match what's drawn.
//! Pass `max_display: None` to get the full matrix.
//!
//! # Malformed cells
//!
//! A short row leaves its missing cells empty, a long row has its extra
//! cells dropped, and a non-finite or out-of-range value is skipped. Each
//! one is reported; nothing aborts.

mod bucket;
mod stats;

pub use bucket::*;
pub use stats::*;

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;
use crate::verify::contracts::check_bucket_floors;

/// Default display cap, in rows.
pub const DEFAULT_MAX_DISPLAY: usize = 20;

/// Slack for similarities a hair outside [0, 1] from float rounding.
const SCORE_EPSILON: f64 = 1e-6;

/// Square matrix of similarity scores with possibly missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    /// Row-major, `size * size` entries.
    cells: Vec<Option<f64>>,
}

impl SimilarityMatrix {
    /// Build from raw rows. The row count fixes the size.
    ///
    /// Values within `1e-6` of the unit interval are clamped into it.
    pub fn from_rows(rows: &[Vec<f64>]) -> (Self, Vec<MalformedInput>) {
        let size = rows.len();
        let mut cells = vec![None; size * size];
        let mut skipped = Vec::new();

        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                skipped.push(MalformedInput::RaggedRow {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            for (col, &value) in values.iter().take(size).enumerate() {
                match checked_score(value) {
                    Some(score) => cells[row * size + col] = Some(score),
                    None => skipped.push(MalformedInput::InvalidCell { row, col, value }),
                }
            }
        }

        for skip in &skipped {
            tracing::warn!(%skip, "skipping malformed similarity cell");
        }
        (Self { size, cells }, skipped)
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The cell at `(i, j)`, or `None` if out of range or skipped.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.cells[i * self.size + j]
    }
}

fn checked_score(value: f64) -> Option<f64> {
    if !value.is_finite() || value < -SCORE_EPSILON || value > 1.0 + SCORE_EPSILON {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}

/// Display cap and statistics policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatrixOptions {
    /// Largest matrix reported in full. `None` disables truncation.
    pub max_display: Option<usize>,
    pub diagonal: DiagonalPolicy,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            max_display: Some(DEFAULT_MAX_DISPLAY),
            diagonal: DiagonalPolicy::default(),
        }
    }
}

impl MatrixOptions {
    /// Same options with truncation turned off.
    pub fn full(self) -> Self {
        Self {
            max_display: None,
            ..self
        }
    }
}

/// One displayed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBucket {
    pub value: f64,
    pub bucket: Bucket,
    pub label: String,
    pub diagonal: bool,
}

/// What a heatmap needs: sizes, statistics, and a bucket per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixReport {
    /// Full matrix size `n`.
    pub size: usize,
    /// Reported size `k ≤ n`.
    pub displayed: usize,
    pub truncated: bool,
    pub stats: Option<MatrixStats>,
    /// `displayed × displayed`; `None` where the cell was skipped.
    pub cells: Vec<Vec<Option<CellBucket>>>,
}

/// Bucketize and summarize a matrix under the given options.
pub fn analyze(
    matrix: &SimilarityMatrix,
    options: &MatrixOptions,
    palette: &BucketPalette,
) -> MatrixReport {
    check_bucket_floors();
    let size = matrix.size();
    let displayed = options.max_display.map_or(size, |cap| size.min(cap));
    let truncated = displayed < size;
    if truncated {
        tracing::debug!(size, displayed, "similarity matrix truncated for display");
    }

    let cells = (0..displayed)
        .map(|i| {
            (0..displayed)
                .map(|j| {
                    matrix.get(i, j).map(|value| {
                        let bucket = Bucket::of(value);
                        CellBucket {
                            value,
                            bucket,
                            label: palette.label(bucket).to_string(),
                            diagonal: i == j,
                        }
                    })
                })
                .collect()
        })
        .collect();

    MatrixReport {
        size,
        displayed,
        truncated,
        stats: MatrixStats::compute(matrix, displayed, options.diagonal),
        cells,
    }
}
