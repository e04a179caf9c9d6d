// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for similarity matrix analysis.
//!
//! Matrices come in ragged, with NaN, infinities, and out-of-range scores.
//! Analysis must never panic, every bad cell must be reported, and every
//! reported cell must sit in the bucket its value says.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use chunklens::{
    analyze, find_discontinuities, Bucket, BucketPalette, DiagonalPolicy, MatrixOptions,
    SeverityThresholds, SimilarityMatrix,
};

#[derive(Debug, Arbitrary)]
struct MatrixInput {
    rows: Vec<Vec<f64>>,
    max_display: Option<u8>,
    include_diagonal: bool,
}

/// Tests critical invariants:
/// - INVARIANT 1: displayed == min(size, cap) and cells is displayed × displayed
/// - INVARIANT 2: Every cell's bucket is Bucket::of(value), value in [0, 1]
/// - INVARIANT 3: min <= avg <= max whenever stats exist
/// - INVARIANT 4: Discontinuities are on the superdiagonal only
fuzz_target!(|input: MatrixInput| {
    let rows: Vec<Vec<f64>> = input
        .rows
        .into_iter()
        .take(32)
        .map(|r| r.into_iter().take(40).collect())
        .collect();
    let (matrix, _skipped) = SimilarityMatrix::from_rows(&rows);

    let options = MatrixOptions {
        max_display: input.max_display.map(|m| m.max(1) as usize),
        diagonal: if input.include_diagonal {
            DiagonalPolicy::Include
        } else {
            DiagonalPolicy::Exclude
        },
    };
    let report = analyze(&matrix, &options, &BucketPalette::default());

    // INVARIANT 1
    let expected = options
        .max_display
        .map_or(matrix.size(), |cap| matrix.size().min(cap));
    assert_eq!(report.displayed, expected);
    assert_eq!(report.cells.len(), expected);
    assert!(report.cells.iter().all(|row| row.len() == expected));

    // INVARIANT 2
    for cell in report.cells.iter().flatten().flatten() {
        assert!((0.0..=1.0).contains(&cell.value), "unclamped {}", cell.value);
        assert_eq!(cell.bucket, Bucket::of(cell.value));
    }

    // INVARIANT 3
    if let Some(stats) = report.stats {
        assert!(stats.cells > 0);
        assert!(stats.min <= stats.avg + 1e-12 && stats.avg <= stats.max + 1e-12);
    }

    // INVARIANT 4
    for d in find_discontinuities(&matrix, &[], &SeverityThresholds::default()) {
        assert_eq!(d.chunk_b_index, d.chunk_a_index + 1);
        assert!(d.similarity < SeverityThresholds::default().medium_below);
    }
});
