// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Score buckets: continuous [0, 1] values to display categories.
//!
//! # Bucket table
//!
//! | Bucket     | Range         |
//! |------------|---------------|
//! | `VeryHigh` | `[0.8, 1.0]`  |
//! | `High`     | `[0.6, 0.8)`  |
//! | `Moderate` | `[0.4, 0.6)`  |
//! | `Low`      | `[0.2, 0.4)`  |
//! | `VeryLow`  | `[0.0, 0.2)`  |
//!
//! Lower bounds are inclusive, so `0.8` lands in `VeryHigh` and `0.7999` in
//! `High`. The labels a renderer shows come from a `BucketPalette`, which is
//! configuration, not code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inclusive lower bounds, highest bucket first.
pub const BUCKET_FLOORS: [(f64, Bucket); 4] = [
    (0.8, Bucket::VeryHigh),
    (0.6, Bucket::High),
    (0.4, Bucket::Moderate),
    (0.2, Bucket::Low),
];

/// Ordinal similarity category. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::VeryHigh,
        Bucket::High,
        Bucket::Moderate,
        Bucket::Low,
        Bucket::VeryLow,
    ];

    /// Bucket for a score. Values above 1.0 land in `VeryHigh`; negatives
    /// and NaN land in `VeryLow`.
    pub fn of(value: f64) -> Bucket {
        BUCKET_FLOORS
            .iter()
            .find(|(floor, _)| value >= *floor)
            .map_or(Bucket::VeryLow, |&(_, bucket)| bucket)
    }

    /// The numeric range as text, used when a palette has no entry.
    pub fn range_label(self) -> &'static str {
        match self {
            Bucket::VeryHigh => "0.8-1.0",
            Bucket::High => "0.6-0.8",
            Bucket::Moderate => "0.4-0.6",
            Bucket::Low => "0.2-0.4",
            Bucket::VeryLow => "0.0-0.2",
        }
    }
}

/// Injected bucket → label mapping.
///
/// Renderers key colors or localized names off this instead of hard-coding
/// the table. Missing entries fall back to `Bucket::range_label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketPalette(pub BTreeMap<Bucket, String>);

impl Default for BucketPalette {
    fn default() -> Self {
        BucketPalette(
            Bucket::ALL
                .iter()
                .map(|&b| (b, b.range_label().to_string()))
                .collect(),
        )
    }
}

impl BucketPalette {
    pub fn label(&self, bucket: Bucket) -> &str {
        self.0
            .get(&bucket)
            .map_or(bucket.range_label(), String::as_str)
    }
}

/// Overall answer quality grade.
///
/// Same idea as `Bucket` with a coarser, four-step scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualityGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityGrade {
    pub fn of(score: f64) -> QualityGrade {
        if score >= 0.8 {
            QualityGrade::Excellent
        } else if score >= 0.6 {
            QualityGrade::Good
        } else if score >= 0.4 {
            QualityGrade::Fair
        } else {
            QualityGrade::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityGrade::Excellent => "Excellent",
            QualityGrade::Good => "Good",
            QualityGrade::Fair => "Fair",
            QualityGrade::Poor => "Poor",
        }
    }
}
