// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Input payloads, as the retrieval service sends them.
//!
//! Field names are snake_case and stable. Unknown fields (`content_preview`
//! on chunks, service bookkeeping) are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AnnotationSpan, ChunkSpan, RetrievedChunk};

/// A document and the chunks one strategy cut it into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub full_text: String,
    pub chunks: Vec<ChunkSpan>,
    #[serde(default)]
    pub chunk_strategy: Option<String>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}

/// Pairwise chunk similarities.
///
/// Cells are optional on the wire: a `null` cell is kept and later reported
/// as malformed instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPayload {
    pub similarity_matrix: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub chunk_ids: Vec<String>,
}

impl SimilarityPayload {
    /// Rows with `null` cells as NaN, ready for `SimilarityMatrix::from_rows`.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.similarity_matrix
            .iter()
            .map(|row| row.iter().map(|cell| cell.unwrap_or(f64::NAN)).collect())
            .collect()
    }
}

/// A generated answer with the evaluator's hallucination flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    #[serde(default)]
    pub hallucinations: Vec<AnnotationSpan>,
    /// Overall answer quality in `[0, 1]`, if the evaluator scored it.
    #[serde(default)]
    pub quality: Option<f64>,
}

/// A document, all its chunks, and the ones retrieval picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPayload {
    pub full_text: String,
    pub all_chunks: Vec<ChunkSpan>,
    #[serde(default)]
    pub retrieved_chunks: Vec<RetrievedChunk>,
}

/// Parse any payload from JSON text.
pub fn parse<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}
