// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Span overlay and highlighting for retrieval debugging.
//!
//! Takes the raw material of a RAG pipeline (a document and its chunks, a
//! chunk similarity matrix, a generated answer with flagged hallucinations,
//! a retrieval result) and turns it into things a renderer can draw without
//! thinking: non-overlapping text segments tagged with span ids, overlap
//! regions, discontinuities, and bucketed heatmap cells.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  overlap.rs  │   │  locate.rs   │   │ retrieval.rs │
//! │ (overlaps,   │   │ (annotation  │   │ (rank tiers) │
//! │  stats)      │   │  → offsets)  │   │              │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        │   derived spans  │                  │
//!        ▼                  ▼                  ▼
//! ┌─────────────────────────────────────────────────────┐
//! │        partition.rs  (sweep line over index/)        │
//! │        → RenderSegment[] tiling [0, N)               │
//! └─────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!               render.rs → CLI display / JSON
//!
//! matrix/  (buckets, stats, display cap) runs on its own.
//! verify/  (validators, debug contracts) checks every output.
//! ```
//!
//! # Modules
//!
//! | Module      | Role                                              |
//! |-------------|---------------------------------------------------|
//! | `types`     | TextBuffer, Span, ChunkSpan, RenderSegment, ...   |
//! | `index`     | IntervalIndex: sorted spans, boundary lookups     |
//! | `overlap`   | Overlap regions, discontinuities, chunk stats     |
//! | `locate`    | Two-pass annotation locator                       |
//! | `partition` | Sweep-line segmenter                              |
//! | `matrix`    | Buckets, statistics, truncation                   |
//! | `retrieval` | Retrieved chunks as ranked spans                  |
//! | `render`    | One pipeline per payload                          |
//! | `verify`    | Validators and runtime contracts                  |
//!
//! # Usage
//!
//! ```ignore
//! use chunklens::{partition, SpanCollection, TextBuffer};
//!
//! let buffer = TextBuffer::new("The answer is 42.");
//! let spans = vec![/* ... */];
//! let result = partition(&buffer, &[SpanCollection::new("chunk", spans)]);
//! for segment in &result.segments { /* style by segment.active_span_ids */ }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod locate;
pub mod matrix;
pub mod overlap;
pub mod partition;
pub mod payload;
pub mod render;
pub mod retrieval;
pub mod testing;
pub mod types;
mod utils;
pub mod verify;

pub use config::{EngineConfig, LocateConfig, SeverityLabels};
pub use error::{Error, MalformedInput, Result};
pub use index::{IntervalIndex, Sweep};
pub use locate::{locate_annotations, LocateStrategy, Located};
pub use matrix::{
    analyze, Bucket, BucketPalette, CellBucket, DiagonalPolicy, MatrixOptions, MatrixReport,
    MatrixStats, QualityGrade, SimilarityMatrix,
};
pub use overlap::{find_discontinuities, resolve_overlaps, ChunkStatistics, SeverityThresholds};
pub use partition::{partition, Partition, SpanCollection};
pub use payload::{AnswerPayload, ChunkPayload, ContextPayload, SimilarityPayload};
pub use render::{
    render_answer, render_chunks, render_context, render_similarity, AnswerRender, ChunkRender,
    ContextRender, SimilarityRender,
};
pub use retrieval::{retrieval_spans, RankTier};
pub use types::{
    AnnotationSpan, ChunkSpan, Discontinuity, DropCause, DroppedAnnotation, LocatedSpan, Metadata,
    OverlapRegion, RenderSegment, RetrievedChunk, Severity, Span, SpanId, TextBuffer,
};
pub use utils::char_len;
pub use verify::{
    validate_located, validate_partition, InvariantError, MonotonicSpans, WellFormedPartition,
};
