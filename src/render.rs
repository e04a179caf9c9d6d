// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One pipeline per payload kind.
//!
//! Each function takes a parsed payload (plus config, for the pipelines that
//! have settings) and returns everything a view needs, computed once. No caching here: callers re-run a pipeline
//! when its input changes and keep the result as long as they like.
//!
//! | Pipeline            | Collections partitioned      |
//! |---------------------|------------------------------|
//! | `render_chunks`     | `chunk`, `overlap`           |
//! | `render_similarity` | (none; matrix only)          |
//! | `render_answer`     | `hallucination`              |
//! | `render_context`    | `chunk`, `retrieved`         |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::MalformedInput;
use crate::locate::locate_annotations;
use crate::matrix::{analyze, MatrixReport, QualityGrade, SimilarityMatrix};
use crate::overlap::{find_discontinuities, resolve_overlaps, ChunkStatistics};
use crate::partition::{partition, Partition, SpanCollection};
use crate::payload::{AnswerPayload, ChunkPayload, ContextPayload, SimilarityPayload};
use crate::retrieval::retrieval_spans;
use crate::types::{
    ChunkSpan, Discontinuity, DroppedAnnotation, LocatedSpan, OverlapRegion, RenderSegment, Span,
    SpanId, TextBuffer,
};

pub const CHUNK_COLLECTION: &str = "chunk";
pub const OVERLAP_COLLECTION: &str = "overlap";
pub const HALLUCINATION_COLLECTION: &str = "hallucination";
pub const RETRIEVED_COLLECTION: &str = "retrieved";

// =============================================================================
// CHUNK VISUALIZATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRender {
    pub segments: Vec<RenderSegment>,
    pub overlaps: Vec<OverlapRegion>,
    pub statistics: ChunkStatistics,
    pub skipped: Vec<MalformedInput>,
}

/// Chunks and their overlap regions over the document.
///
/// A chunk the partitioner rejects (inverted, past the end, repeated id) is
/// reported in `skipped` and left out of the overlaps and statistics too.
pub fn render_chunks(payload: &ChunkPayload) -> ChunkRender {
    let buffer = TextBuffer::new(payload.full_text.as_str());
    let placed = placeable_chunks(&payload.chunks, buffer.len());
    let overlaps = resolve_overlaps(&buffer, &placed);
    let statistics = ChunkStatistics::compute(&buffer, &placed, &overlaps);

    let collections = [
        SpanCollection::new(CHUNK_COLLECTION, chunk_spans(&payload.chunks)),
        SpanCollection::new(OVERLAP_COLLECTION, overlap_spans(&overlaps)),
    ];
    let Partition {
        segments, skipped, ..
    } = partition(&buffer, &collections);

    ChunkRender {
        segments,
        overlaps,
        statistics,
        skipped,
    }
}

/// Chunks the partitioner will accept: `start ≤ end ≤ len`, first of each id.
fn placeable_chunks(chunks: &[ChunkSpan], len: usize) -> Vec<ChunkSpan> {
    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter(|c| c.start <= c.end && c.end <= len)
        .filter(|c| seen.insert(c.id.as_str()))
        .cloned()
        .collect()
}

fn chunk_spans(chunks: &[ChunkSpan]) -> Vec<Span> {
    chunks.iter().map(|c| c.to_span(CHUNK_COLLECTION)).collect()
}

/// Overlap regions keyed by the index of the chunk they follow.
fn overlap_spans(overlaps: &[OverlapRegion]) -> Vec<Span> {
    overlaps
        .iter()
        .map(|o| {
            Span::new(
                SpanId::new(OVERLAP_COLLECTION, o.chunk_a_index.to_string()),
                o.start,
                o.end,
            )
            .with_meta("chunkAId", o.chunk_a_id.as_str())
            .with_meta("chunkBId", o.chunk_b_id.as_str())
        })
        .collect()
}

// =============================================================================
// SIMILARITY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityRender {
    pub report: MatrixReport,
    pub discontinuities: Vec<Discontinuity>,
    pub skipped: Vec<MalformedInput>,
}

/// Heatmap buckets, statistics, and discontinuities.
///
/// Discontinuities are found over the whole superdiagonal, not just the
/// displayed part.
pub fn render_similarity(payload: &SimilarityPayload, config: &EngineConfig) -> SimilarityRender {
    let (matrix, mut skipped) = SimilarityMatrix::from_rows(&payload.rows());

    if !payload.chunk_ids.is_empty() && payload.chunk_ids.len() != matrix.size() {
        let skip = MalformedInput::ChunkIdMismatch {
            rows: matrix.size(),
            ids: payload.chunk_ids.len(),
        };
        tracing::warn!(%skip, "chunk ids do not line up with matrix");
        skipped.push(skip);
    }

    SimilarityRender {
        report: analyze(&matrix, &config.matrix, &config.palette),
        discontinuities: find_discontinuities(&matrix, &payload.chunk_ids, &config.discontinuity),
        skipped,
    }
}

// =============================================================================
// ANSWER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRender {
    pub located: Vec<LocatedSpan>,
    pub dropped: Vec<DroppedAnnotation>,
    pub segments: Vec<RenderSegment>,
    pub skipped: Vec<MalformedInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<QualityGrade>,
}

/// Hallucinations located in the answer and highlighted.
pub fn render_answer(payload: &AnswerPayload, config: &EngineConfig) -> AnswerRender {
    let buffer = TextBuffer::new(payload.answer.as_str());
    let located = locate_annotations(&buffer, &payload.hallucinations, config.locate.strategy);

    let collections = [SpanCollection::new(
        HALLUCINATION_COLLECTION,
        located.to_spans(HALLUCINATION_COLLECTION),
    )];
    let partition = partition(&buffer, &collections);

    AnswerRender {
        located: located.spans,
        dropped: located.dropped,
        segments: partition.segments,
        skipped: partition.skipped,
        quality: payload.quality,
        grade: payload.quality.map(QualityGrade::of),
    }
}

// =============================================================================
// DOCUMENT CONTEXT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRender {
    pub segments: Vec<RenderSegment>,
    /// The retrieved chunks that were placed, best rank first.
    pub retrieved: Vec<Span>,
    pub skipped: Vec<MalformedInput>,
}

/// Retrieved chunks highlighted in their source document.
///
/// Hits on a chunk the partitioner rejects are reported as unknown chunks.
pub fn render_context(payload: &ContextPayload) -> ContextRender {
    let buffer = TextBuffer::new(payload.full_text.as_str());
    let placed = placeable_chunks(&payload.all_chunks, buffer.len());
    let (retrieved, mut skipped) = retrieval_spans(
        &placed,
        &payload.retrieved_chunks,
        RETRIEVED_COLLECTION,
    );

    let collections = [
        SpanCollection::new(CHUNK_COLLECTION, chunk_spans(&payload.all_chunks)),
        SpanCollection::new(RETRIEVED_COLLECTION, retrieved),
    ];
    let Partition {
        segments,
        skipped: partition_skipped,
        spans,
    } = partition(&buffer, &collections);
    skipped.extend(partition_skipped);

    let retrieved = spans
        .into_iter()
        .filter(|s| s.id.collection == RETRIEVED_COLLECTION)
        .collect();

    ContextRender {
        segments,
        retrieved,
        skipped,
    }
}
