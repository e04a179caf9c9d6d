// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Retrieved chunks as a span collection over the source document.
//!
//! Retrieval returns chunk ids with a rank and maybe a score. To show them
//! in context they need offsets, which only the document's chunk list has.
//! This module joins the two and tags each hit with a rank tier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;
use crate::types::{ChunkSpan, RetrievedChunk, Span, SpanId};

/// Display tier for a 1-based retrieval rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankTier {
    First,
    Second,
    Third,
    TopFive,
    Other,
}

impl RankTier {
    /// Rank 0 is treated as rank 1.
    pub fn of(rank: usize) -> RankTier {
        match rank {
            0 | 1 => RankTier::First,
            2 => RankTier::Second,
            3 => RankTier::Third,
            4 | 5 => RankTier::TopFive,
            _ => RankTier::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankTier::First => "first",
            RankTier::Second => "second",
            RankTier::Third => "third",
            RankTier::TopFive => "topFive",
            RankTier::Other => "other",
        }
    }
}

/// One span per retrieved chunk that exists in `chunks`.
///
/// Spans are ordered by rank. Each carries `rank`, `score` (null when the
/// service sent none), `tier`, and `label` (`#1`, `#2`, ...). When a chunk
/// was retrieved more than once, the best rank wins.
pub fn retrieval_spans(
    chunks: &[ChunkSpan],
    retrieved: &[RetrievedChunk],
    collection: &str,
) -> (Vec<Span>, Vec<MalformedInput>) {
    let by_id: BTreeMap<&str, &ChunkSpan> = chunks.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut best: BTreeMap<&str, &RetrievedChunk> = BTreeMap::new();
    let mut skipped = Vec::new();
    for hit in retrieved {
        if !by_id.contains_key(hit.chunk_id.as_str()) {
            let skip = MalformedInput::UnknownChunk {
                chunk_id: hit.chunk_id.clone(),
            };
            tracing::warn!(%skip, "skipping retrieval hit");
            skipped.push(skip);
            continue;
        }
        best.entry(hit.chunk_id.as_str())
            .and_modify(|kept| {
                if hit.rank < kept.rank {
                    *kept = hit;
                }
            })
            .or_insert(hit);
    }

    let mut hits: Vec<&RetrievedChunk> = best.into_values().collect();
    hits.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.chunk_id.cmp(&b.chunk_id)));

    let spans = hits
        .into_iter()
        .filter_map(|hit| {
            let chunk = by_id.get(hit.chunk_id.as_str())?;
            let tier = RankTier::of(hit.rank);
            Some(
                Span::new(SpanId::new(collection, hit.chunk_id.as_str()), chunk.start, chunk.end)
                    .with_meta("rank", hit.rank)
                    .with_meta("score", hit.score)
                    .with_meta("tier", tier.as_str())
                    .with_meta("label", format!("#{}", hit.rank))
                    .with_meta("chunkIndex", chunk.index),
            )
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        retrieved = retrieved.len(),
        placed = spans.len(),
        "placed retrieved chunks"
    );
    (spans, skipped)
}
