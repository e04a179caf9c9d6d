//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::types::{AnnotationSpan, ChunkSpan, Metadata, RetrievedChunk, Span, SpanId};

/// Create a chunk with no token count or metadata.
///
/// This is the canonical implementation used across all tests.
pub fn make_chunk(id: &str, index: usize, start: usize, end: usize) -> ChunkSpan {
    ChunkSpan {
        id: id.to_string(),
        index,
        start,
        end,
        token_count: 0,
        metadata: Metadata::new(),
    }
}

/// Chunks of `size` characters stepping by `size - overlap`, covering `len`.
///
/// The last chunk is cut at `len`. `overlap` must be smaller than `size`.
pub fn make_chunks(len: usize, size: usize, overlap: usize) -> Vec<ChunkSpan> {
    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let end = (start + size).min(len);
        let index = chunks.len();
        chunks.push(make_chunk(&format!("chunk_{}", index), index, start, end));
        if end == len {
            break;
        }
        start += step;
    }
    chunks
}

/// Create a span with an empty metadata map.
pub fn make_span(collection: &str, key: &str, start: usize, end: usize) -> Span {
    Span::new(SpanId::new(collection, key), start, end)
}

/// Create an annotation with a generic reason.
pub fn make_annotation(text: &str) -> AnnotationSpan {
    AnnotationSpan::new(text, format!("unsupported: {}", text))
}

/// Create a retrieval hit.
pub fn make_retrieved(chunk_id: &str, rank: usize, score: Option<f64>) -> RetrievedChunk {
    RetrievedChunk {
        chunk_id: chunk_id.to_string(),
        rank,
        score,
    }
}
