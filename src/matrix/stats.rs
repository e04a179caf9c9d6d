// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Aggregate statistics over a similarity matrix.

use serde::{Deserialize, Serialize};

use super::SimilarityMatrix;

/// Whether self-similarity cells take part in the aggregates.
///
/// The diagonal is 1.0 by construction, so including it drags `avg` up and
/// pins `max` at 1.0. The default leaves it out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagonalPolicy {
    Include,
    #[default]
    Exclude,
}

/// `avg`, `min`, `max` over the counted cells, plus how many were counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub cells: usize,
}

impl MatrixStats {
    /// Statistics over the leading `k × k` submatrix.
    ///
    /// `k` is clamped to the matrix size. Missing cells are not counted.
    /// Returns `None` when no cell qualifies (empty matrix, or a 1×1 matrix
    /// with the diagonal excluded).
    pub fn compute(matrix: &SimilarityMatrix, k: usize, policy: DiagonalPolicy) -> Option<Self> {
        let k = k.min(matrix.size());
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut cells = 0usize;

        for i in 0..k {
            for j in 0..k {
                if i == j && policy == DiagonalPolicy::Exclude {
                    continue;
                }
                if let Some(value) = matrix.get(i, j) {
                    sum += value;
                    min = min.min(value);
                    max = max.max(value);
                    cells += 1;
                }
            }
        }

        (cells > 0).then(|| MatrixStats {
            avg: sum / cells as f64,
            min,
            max,
            cells,
        })
    }
}
