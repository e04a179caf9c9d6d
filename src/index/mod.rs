// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Span indexing: the ordered view of spans every other component queries.
//!
//! One index type for now:
//! - **Interval index**: spans sorted by `(start, end, input order)` plus the
//!   deduplicated boundary set, O(log n) for boundary and covering lookups

mod interval;

pub use interval::*;
