// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The values the engine passes around.
//!
//! Everything here is plain data. Inputs arrive from the retrieval service as
//! snake_case JSON; outputs go to a renderer as camelCase JSON. Nothing in
//! this module holds state between calls.
//!
//! # Offsets
//!
//! Every offset is a **character** offset (Unicode scalar value), half-open:
//! `[start, end)` with `0 ≤ start ≤ end ≤ N`. The service computes offsets
//! over code points, so byte offsets would silently drift on the first
//! accented character. `TextBuffer` does the char→byte translation once.
//!
//! # Invariants
//!
//! - **Span**: `start ≤ end ≤ N`. Zero-width spans are legal and never active.
//! - **RenderSegment list**: contiguous, non-overlapping, covers `[0, N)`.
//! - **LocatedSpan list**: strictly increasing `start`, no two overlap.
//!
//! `verify` has validators and debug contracts for the last two.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Free-form metadata attached to spans and chunks.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// TEXT BUFFER
// =============================================================================

/// An immutable text with O(1) slicing by character range.
///
/// Holds the byte position of every character plus a trailing entry for the
/// end of the string, so `char_starts.len() == N + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    char_starts: Vec<usize>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut char_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_starts.push(text.len());
        Self { text, char_starts }
    }

    /// Length in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.char_starts.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte position of a character offset, or `None` past the end.
    #[inline]
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.char_starts.get(char_offset).copied()
    }

    /// Text of the character range `[start, end)`.
    ///
    /// Returns `None` for an inverted or out-of-bounds range.
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let from = self.byte_offset(start)?;
        let to = self.byte_offset(end)?;
        Some(&self.text[from..to])
    }

    /// Like `slice`, but clamps both ends to the buffer first.
    pub fn slice_clamped(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.len());
        let start = start.min(end);
        self.slice(start, end).unwrap_or_default()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        TextBuffer::new(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        TextBuffer::new(text)
    }
}

// =============================================================================
// SPANS
// =============================================================================

/// Identifies a span across every collection fed to the partitioner.
///
/// The collection name keeps ids from different sources apart: chunk `3`
/// and hallucination `3` are different spans. Serialized as
/// `"collection:key"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SpanId {
    pub collection: String,
    pub key: String,
}

impl SpanId {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.key)
    }
}

impl From<SpanId> for String {
    fn from(id: SpanId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for SpanId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.split_once(':') {
            Some((collection, key)) if !collection.is_empty() => Ok(SpanId::new(collection, key)),
            _ => Err(format!("span id '{}' is not of the form collection:key", value)),
        }
    }
}

/// A half-open character range with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub id: SpanId,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Span {
    pub fn new(id: SpanId, start: usize, end: usize) -> Self {
        Self {
            id,
            start,
            end,
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insertion.
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `start ≤ end`. Says nothing about the buffer length.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Check if an offset falls within this span.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Membership test used by the partitioner: does this span cover all of
    /// `[start, end)`?
    #[inline]
    pub fn covers(&self, start: usize, end: usize) -> bool {
        self.start <= start && self.end >= end
    }
}

// =============================================================================
// CHUNKS AND DERIVED REGIONS
// =============================================================================

/// One retrieval unit produced by the service's chunker.
///
/// Field names on the wire follow the service's chunk visualization payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSpan {
    #[serde(rename = "chunk_id")]
    pub id: String,
    #[serde(rename = "chunk_index")]
    pub index: usize,
    #[serde(rename = "start_pos")]
    pub start: usize,
    #[serde(rename = "end_pos")]
    pub end: usize,
    #[serde(default)]
    pub token_count: usize,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ChunkSpan {
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The chunk as a span in `collection`, carrying index and token count.
    pub fn to_span(&self, collection: &str) -> Span {
        let mut span = Span::new(SpanId::new(collection, self.id.as_str()), self.start, self.end)
            .with_meta("chunkIndex", self.index)
            .with_meta("tokenCount", self.token_count);
        for (key, value) in &self.metadata {
            span.metadata.entry(key.clone()).or_insert_with(|| value.clone());
        }
        span
    }
}

/// Text shared by two consecutive chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapRegion {
    pub chunk_a_id: String,
    pub chunk_b_id: String,
    pub chunk_a_index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl OverlapRegion {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// How bad a drop in adjacent-chunk similarity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
        }
    }
}

/// Adjacent chunks whose similarity fell below a severity threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discontinuity {
    pub chunk_a_index: usize,
    pub chunk_b_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_a_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_b_id: Option<String>,
    pub similarity: f64,
    pub severity: Severity,
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// A hallucination flagged by the evaluator: literal text plus a reason.
///
/// No offsets. The locator has to find the text in the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSpan {
    pub text: String,
    #[serde(default)]
    pub reason: String,
}

impl AnnotationSpan {
    pub fn new(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// An annotation placed in the answer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedSpan {
    pub start: usize,
    pub end: usize,
    /// The answer's own text at `[start, end)` (original casing).
    pub text: String,
    pub reason: String,
    /// Position of the annotation in the caller's input list.
    pub annotation: usize,
}

/// Why an annotation was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropCause {
    /// Not found from the cursor onward (usually a paraphrase).
    NotFound,
    /// Empty or whitespace-only annotation text.
    EmptyText,
}

/// An annotation the locator gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedAnnotation {
    pub annotation: usize,
    pub text: String,
    pub cause: DropCause,
}

// =============================================================================
// RETRIEVAL
// =============================================================================

/// A chunk returned by retrieval for some query, with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub rank: usize,
    #[serde(default)]
    pub score: Option<f64>,
}

// =============================================================================
// RENDER OUTPUT
// =============================================================================

/// One tile of the partition, tagged with every span covering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSegment {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub active_span_ids: BTreeSet<SpanId>,
}

impl RenderSegment {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Is any span from `collection` active here?
    pub fn has_collection(&self, collection: &str) -> bool {
        self.active_span_ids
            .iter()
            .any(|id| id.collection == collection)
    }
}
