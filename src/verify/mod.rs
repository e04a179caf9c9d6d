// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: type-level invariants and runtime contracts.
//!
//! Two complementary approaches to catching bugs:
//!
//! 1. **Validators and wrappers** (`validate_partition`,
//!    `WellFormedPartition`) that check render output once and let callers
//!    rely on it afterwards.
//!
//! 2. **Runtime contracts** that panic in debug builds when an engine
//!    operation breaks its own guarantee. Zero-cost in release, but catch
//!    bugs while tests run.

mod types;
pub mod contracts;

pub use types::*;
