// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors and skip reasons.
//!
//! Two very different things live here. `Error` is for calls that cannot
//! proceed at all: a config file that doesn't parse, a payload that isn't
//! JSON. `MalformedInput` is for a single bad span or matrix cell inside an
//! otherwise fine input. The engine skips those, keeps going, and hands the
//! list back so the caller can flag it without breaking the page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard failures at the edges of the engine (config, payload parsing, I/O).
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One input item the engine refused and skipped.
///
/// Every variant names the offending item so a log line is enough to find it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MalformedInput {
    #[error("span {id} has start {start} > end {end}")]
    #[serde(rename_all = "camelCase")]
    InvertedSpan { id: String, start: usize, end: usize },

    #[error("span {id} [{start}, {end}) exceeds buffer length {len}")]
    #[serde(rename_all = "camelCase")]
    OutOfBounds {
        id: String,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("span id {id} appears more than once")]
    #[serde(rename_all = "camelCase")]
    DuplicateSpanId { id: String },

    #[error("matrix row {row} has {len} cells, expected {expected}")]
    #[serde(rename_all = "camelCase")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("matrix cell [{row}][{col}] = {value} is not a score in [0, 1]")]
    #[serde(rename_all = "camelCase")]
    InvalidCell { row: usize, col: usize, value: f64 },

    #[error("matrix has {rows} rows but {ids} chunk ids")]
    #[serde(rename_all = "camelCase")]
    ChunkIdMismatch { rows: usize, ids: usize },

    #[error("retrieved chunk {chunk_id} is not part of the document")]
    #[serde(rename_all = "camelCase")]
    UnknownChunk { chunk_id: String },
}
