// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Boxed terminal views, one per render pipeline.

use std::collections::HashMap;

use chunklens::render::{CHUNK_COLLECTION, HALLUCINATION_COLLECTION, OVERLAP_COLLECTION, RETRIEVED_COLLECTION};
use chunklens::{
    AnswerRender, Bucket, ChunkPayload, ChunkRender, ContextRender, EngineConfig, MalformedInput,
    RankTier, RenderSegment, SimilarityRender,
};

use super::display::*;

/// Colors cycled over chunk indexes so neighbours differ.
const CHUNK_COLORS: [fn() -> String; 4] = [BLUE, GREEN, MAGENTA, CYAN];

const PREVIEW_CHARS: usize = 48;

// ═══════════════════════════════════════════════════════════════════════════
// CHUNKS
// ═══════════════════════════════════════════════════════════════════════════

pub fn print_chunks(payload: &ChunkPayload, render: &ChunkRender) {
    let index_of: HashMap<&str, usize> = payload
        .chunks
        .iter()
        .map(|c| (c.id.as_str(), c.index))
        .collect();

    title("CHUNK VIEW");
    let strategy = payload.chunk_strategy.as_deref().unwrap_or("unknown");
    section_top("Document");
    row(&format!(
        " strategy {}  size {}  overlap {}",
        themed(CYAN, &[BOLD], strategy),
        payload.chunk_size.map_or("-".to_string(), |s| s.to_string()),
        payload.chunk_overlap.map_or("-".to_string(), |s| s.to_string()),
    ));
    section_mid("Text");
    let pieces: Vec<(String, String)> = render
        .segments
        .iter()
        .map(|segment| (segment.text.clone(), chunk_style(segment, &index_of)))
        .collect();
    wrapped_rows(&pieces);

    let stats = &render.statistics;
    section_mid("Statistics");
    row(&format!(" {:<22}{}", "chunks", stats.total_chunks));
    row(&format!(
        " {:<22}{:.1} (min {}, max {})",
        "avg chunk size", stats.avg_chunk_size, stats.min_chunk_size, stats.max_chunk_size
    ));
    row(&format!(
        " {:<22}{} chars, {:.1} avg",
        "overlap", stats.total_overlap_chars, stats.avg_overlap_size
    ));
    row(&format!(" {:<22}{:.1}%", "coverage", stats.coverage));

    if !render.overlaps.is_empty() {
        section_mid("Overlaps");
        for overlap in &render.overlaps {
            row(&format!(
                " {} → {}  [{}, {})  {}",
                overlap.chunk_a_id,
                overlap.chunk_b_id,
                overlap.start,
                overlap.end,
                themed(GRAY, &[], &format!("\"{}\"", truncate(&overlap.text, PREVIEW_CHARS - 20)))
            ));
        }
    }
    print_skipped(&render.skipped);
    section_bot();
}

fn chunk_style(segment: &RenderSegment, index_of: &HashMap<&str, usize>) -> String {
    if !use_colors() {
        return String::new();
    }
    if segment.has_collection(OVERLAP_COLLECTION) {
        return format!("{}{}", OVERLAY_BG(), BOLD);
    }
    let first_chunk = segment
        .active_span_ids
        .iter()
        .filter(|id| id.collection == CHUNK_COLLECTION)
        .filter_map(|id| index_of.get(id.key.as_str()))
        .min();
    match first_chunk {
        Some(index) => CHUNK_COLORS[index % CHUNK_COLORS.len()](),
        None => DIM.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SIMILARITY
// ═══════════════════════════════════════════════════════════════════════════

pub fn print_similarity(render: &SimilarityRender, config: &EngineConfig) {
    let report = &render.report;
    title("CHUNK SIMILARITY");

    section_top(&format!("Heatmap {}×{}", report.displayed, report.displayed));
    if report.truncated {
        row(&themed(
            YELLOW,
            &[],
            &format!(
                " showing the first {} of {} chunks (--full for all)",
                report.displayed, report.size
            ),
        ));
    }
    for (i, cells) in report.cells.iter().enumerate() {
        let line: String = cells
            .iter()
            .map(|cell| heat_cell(cell.as_ref().map(|c| c.bucket), cell.as_ref().is_some_and(|c| c.diagonal)))
            .collect();
        row(&format!(" {} {}", pad_left(&i.to_string(), 3), line));
    }

    section_mid("Legend");
    for bucket in Bucket::ALL {
        row(&format!(
            " {} {}",
            heat_cell(Some(bucket), false),
            config.palette.label(bucket)
        ));
    }

    section_mid("Statistics");
    match &report.stats {
        Some(stats) => {
            row(&format!(" {:<10}{}", "avg", score_value(stats.avg)));
            row(&format!(" {:<10}{}", "min", score_value(stats.min)));
            row(&format!(" {:<10}{}", "max", score_value(stats.max)));
            row(&format!(" {:<10}{}", "cells", stats.cells));
        }
        None => row(&themed(GRAY, &[], " no cells to summarize")),
    }

    section_mid("Discontinuities");
    if render.discontinuities.is_empty() {
        row(&themed(GREEN, &[], " none"));
    }
    for d in &render.discontinuities {
        let a = d.chunk_a_id.clone().unwrap_or_else(|| d.chunk_a_index.to_string());
        let b = d.chunk_b_id.clone().unwrap_or_else(|| d.chunk_b_index.to_string());
        row(&format!(
            " {} {} → {}  {}",
            severity_badge(d.severity, config.severity_labels.label(d.severity)),
            a,
            b,
            score_value(d.similarity)
        ));
    }
    print_skipped(&render.skipped);
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// ANSWER
// ═══════════════════════════════════════════════════════════════════════════

pub fn print_answer(render: &AnswerRender) {
    title("ANSWER");

    section_top("Text");
    let pieces: Vec<(String, String)> = render
        .segments
        .iter()
        .map(|segment| {
            let style = if use_colors() && segment.has_collection(HALLUCINATION_COLLECTION) {
                format!("{}{}", RED(), UNDERLINE)
            } else {
                String::new()
            };
            (segment.text.clone(), style)
        })
        .collect();
    wrapped_rows(&pieces);

    if let (Some(quality), Some(grade)) = (render.quality, render.grade) {
        section_mid("Quality");
        row(&format!(" {}  {}", score_value(quality), grade_label(grade)));
    }

    section_mid(&format!("Hallucinations ({})", render.located.len()));
    for located in &render.located {
        row(&format!(
            " {} {}",
            themed(RED, &[BOLD], &format!("[{}, {})", located.start, located.end)),
            truncate(&located.text, PREVIEW_CHARS)
        ));
        if !located.reason.is_empty() {
            row(&themed(GRAY, &[], &format!("   {}", truncate(&located.reason, BOX_WIDTH - 4))));
        }
    }

    if !render.dropped.is_empty() {
        section_mid(&format!("Not located ({})", render.dropped.len()));
        for dropped in &render.dropped {
            row(&format!(
                " {} {}",
                themed(YELLOW, &[], &format!("#{} {:?}", dropped.annotation, dropped.cause)),
                truncate(&dropped.text, PREVIEW_CHARS)
            ));
        }
    }
    print_skipped(&render.skipped);
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTEXT
// ═══════════════════════════════════════════════════════════════════════════

pub fn print_context(render: &ContextRender) {
    let tier_of: HashMap<&str, RankTier> = render
        .retrieved
        .iter()
        .filter_map(|span| {
            let rank = span.metadata.get("rank")?.as_u64()?;
            Some((span.id.key.as_str(), RankTier::of(rank as usize)))
        })
        .collect();

    title("DOCUMENT CONTEXT");
    section_top("Text");
    let pieces: Vec<(String, String)> = render
        .segments
        .iter()
        .map(|segment| {
            let best = segment
                .active_span_ids
                .iter()
                .filter(|id| id.collection == RETRIEVED_COLLECTION)
                .filter_map(|id| tier_of.get(id.key.as_str()))
                .min();
            let style = match best {
                Some(tier) if use_colors() => format!("{}{}", tier_color(*tier), BOLD),
                Some(_) => String::new(),
                None if use_colors() => DIM.to_string(),
                None => String::new(),
            };
            (segment.text.clone(), style)
        })
        .collect();
    wrapped_rows(&pieces);

    section_mid(&format!("Retrieved ({})", render.retrieved.len()));
    for span in &render.retrieved {
        let label = span.metadata.get("label").and_then(|v| v.as_str()).unwrap_or("#?");
        let tier = tier_of.get(span.id.key.as_str()).copied().unwrap_or(RankTier::Other);
        let score = span
            .metadata
            .get("score")
            .and_then(|v| v.as_f64())
            .map_or_else(|| "  n/a".to_string(), score_value);
        row(&format!(
            " {} {}  [{}, {})  {}",
            pad_right(&tier_badge(tier, label), 4),
            span.id.key,
            span.start,
            span.end,
            score
        ));
    }
    print_skipped(&render.skipped);
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// SHARED
// ═══════════════════════════════════════════════════════════════════════════

fn print_skipped(skipped: &[MalformedInput]) {
    if skipped.is_empty() {
        return;
    }
    section_mid(&format!("Skipped input ({})", skipped.len()));
    for skip in skipped {
        row(&themed(YELLOW, &[], &format!(" {}", truncate(&skip.to_string(), BOX_WIDTH - 2))));
    }
}
