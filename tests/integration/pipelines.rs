//! Fixture payloads through each render pipeline.

use chunklens::render::{CHUNK_COLLECTION, HALLUCINATION_COLLECTION, OVERLAP_COLLECTION, RETRIEVED_COLLECTION};
use chunklens::{
    render_answer, render_chunks, render_context, render_similarity, AnswerPayload, Bucket,
    ChunkPayload, ChunkRender, ContextPayload, DropCause, EngineConfig, LocateStrategy, MalformedInput,
    QualityGrade, Severity, SimilarityPayload, SpanId,
};

use crate::common::{assert_tiles, fixture_path, load_fixture, make_chunk, texts_in};

fn fixture_config() -> EngineConfig {
    EngineConfig::load(fixture_path("config.json")).expect("fixture config loads")
}

// =============================================================================
// CHUNKS
// =============================================================================

#[test]
fn chunk_fixture_overlaps_and_statistics() {
    let payload: ChunkPayload = load_fixture("chunks.json");
    let render = render_chunks(&payload);

    assert!(render.skipped.is_empty());
    assert_tiles(&payload.full_text, &render.segments);

    let regions: Vec<(usize, usize, &str)> = render
        .overlaps
        .iter()
        .map(|o| (o.start, o.end, o.text.as_str()))
        .collect();
    assert_eq!(
        regions,
        vec![(47, 60, "Each chunk is"), (95, 110, " sentences that")]
    );
    assert_eq!(render.overlaps[0].chunk_a_id, "doc1_c0");
    assert_eq!(render.overlaps[1].chunk_b_id, "doc1_c2");

    let stats = &render.statistics;
    assert_eq!(stats.total_chunks, 3);
    assert_eq!((stats.min_chunk_size, stats.max_chunk_size), (60, 63));
    assert!((stats.avg_chunk_size - 62.0).abs() < 1e-9);
    assert_eq!(stats.total_overlap_chars, 28);
    assert!((stats.avg_overlap_size - 14.0).abs() < 1e-9);
    assert!((stats.coverage - 100.0).abs() < 1e-9);
}

#[test]
fn chunk_fixture_segments_carry_both_chunks_in_overlaps() {
    let payload: ChunkPayload = load_fixture("chunks.json");
    let render = render_chunks(&payload);

    let bounds: Vec<(usize, usize)> = render.segments.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(bounds, vec![(0, 47), (47, 60), (60, 95), (95, 110), (110, 158)]);
    assert_eq!(
        texts_in(&render.segments, OVERLAP_COLLECTION),
        vec!["Each chunk is", " sentences that"]
    );

    let first_overlap = &render.segments[1];
    assert!(first_overlap
        .active_span_ids
        .contains(&SpanId::new(CHUNK_COLLECTION, "doc1_c0")));
    assert!(first_overlap
        .active_span_ids
        .contains(&SpanId::new(CHUNK_COLLECTION, "doc1_c1")));
    assert!(first_overlap
        .active_span_ids
        .contains(&SpanId::new(OVERLAP_COLLECTION, "0")));
}

#[test]
fn chunk_outside_the_text_is_skipped_not_fatal() {
    let mut payload: ChunkPayload = load_fixture("chunks.json");
    payload.chunks[2].end = 400;
    let render = render_chunks(&payload);

    assert_tiles(&payload.full_text, &render.segments);
    assert_eq!(render.skipped.len(), 1);
    assert!(matches!(
        &render.skipped[0],
        MalformedInput::OutOfBounds { id, len: 158, .. } if id == "chunk:doc1_c2"
    ));
    assert_eq!(render.overlaps.len(), 1);
    assert_eq!(render.overlaps[0].chunk_b_id, "doc1_c1");
    assert_eq!(render.statistics.total_chunks, 2);
}

#[test]
fn rejected_chunk_stays_out_of_overlaps_and_statistics() {
    let payload = ChunkPayload {
        full_text: "z".repeat(100),
        chunks: vec![
            make_chunk("a", 0, 50, 10),
            make_chunk("b", 1, 5, 30),
            make_chunk("c", 2, 30, 100),
        ],
        chunk_strategy: None,
        chunk_size: None,
        chunk_overlap: None,
    };
    let render = render_chunks(&payload);

    assert_eq!(
        render.skipped,
        vec![MalformedInput::InvertedSpan {
            id: "chunk:a".to_string(),
            start: 50,
            end: 10,
        }]
    );
    assert!(render.overlaps.iter().all(|o| o.chunk_a_id != "a" && o.chunk_b_id != "a"));
    assert!(render.overlaps.is_empty());

    let stats = &render.statistics;
    assert_eq!(stats.total_chunks, 2);
    assert_eq!((stats.min_chunk_size, stats.max_chunk_size), (25, 70));
    assert!((stats.avg_chunk_size - 47.5).abs() < 1e-9);
    assert!((stats.coverage - 95.0).abs() < 1e-9);
    assert_tiles(&payload.full_text, &render.segments);
}

#[test]
fn repeated_chunk_id_counts_once() {
    let payload = ChunkPayload {
        full_text: "q".repeat(40),
        chunks: vec![
            make_chunk("a", 0, 0, 25),
            make_chunk("a", 1, 20, 40),
        ],
        chunk_strategy: None,
        chunk_size: None,
        chunk_overlap: None,
    };
    let render = render_chunks(&payload);

    assert_eq!(
        render.skipped,
        vec![MalformedInput::DuplicateSpanId {
            id: "chunk:a".to_string()
        }]
    );
    assert!(render.overlaps.is_empty());
    assert_eq!(render.statistics.total_chunks, 1);
}

#[test]
fn chunk_render_reads_back_from_json() {
    let mut payload: ChunkPayload = load_fixture("chunks.json");
    payload.chunks[2].end = 400;
    let render = render_chunks(&payload);

    let json = serde_json::to_string(&render).unwrap();
    let back: ChunkRender = serde_json::from_str(&json).unwrap();
    assert_eq!(back.segments, render.segments);
    assert_eq!(back.overlaps, render.overlaps);
    assert_eq!(back.skipped, render.skipped);
    assert_eq!(back.statistics.total_chunks, render.statistics.total_chunks);
}

// =============================================================================
// SIMILARITY
// =============================================================================

#[test]
fn similarity_fixture_with_defaults() {
    let payload: SimilarityPayload = load_fixture("similarity.json");
    let render = render_similarity(&payload, &EngineConfig::default());
    let report = &render.report;

    assert!(render.skipped.is_empty());
    assert_eq!((report.size, report.displayed, report.truncated), (4, 4, false));

    let stats = report.stats.expect("off-diagonal cells present");
    assert_eq!(stats.cells, 12);
    assert!((stats.avg - 4.76 / 12.0).abs() < 1e-9);
    assert!((stats.min - 0.05).abs() < 1e-9);
    assert!((stats.max - 0.82).abs() < 1e-9);

    let cell = report.cells[0][1].as_ref().unwrap();
    assert_eq!(cell.bucket, Bucket::VeryHigh);
    assert_eq!(cell.label, "0.8-1.0");
    assert!(report.cells[2][2].as_ref().unwrap().diagonal);

    let found: Vec<(usize, Option<&str>, Severity)> = render
        .discontinuities
        .iter()
        .map(|d| (d.chunk_a_index, d.chunk_b_id.as_deref(), d.severity))
        .collect();
    assert_eq!(
        found,
        vec![(1, Some("c2"), Severity::Medium), (2, Some("c3"), Severity::High)]
    );
}

#[test]
fn similarity_fixture_with_config_overrides() {
    let payload: SimilarityPayload = load_fixture("similarity.json");
    let config = fixture_config();
    let render = render_similarity(&payload, &config);
    let report = &render.report;

    assert_eq!((report.size, report.displayed, report.truncated), (4, 3, true));
    assert_eq!(report.cells.len(), 3);
    assert!(report.cells.iter().all(|row| row.len() == 3));

    let stats = report.stats.unwrap();
    assert_eq!(stats.cells, 9);
    assert!((stats.max - 1.0).abs() < 1e-9);
    assert!((stats.avg - 5.64 / 9.0).abs() < 1e-9);

    assert_eq!(report.cells[0][1].as_ref().unwrap().label, "strong");
    assert_eq!(report.cells[0][2].as_ref().unwrap().label, "weak");
    assert_eq!(report.cells[1][2].as_ref().unwrap().label, "0.2-0.4");

    // Discontinuities still see the column the display cut off.
    assert_eq!(render.discontinuities.len(), 1);
    let only = &render.discontinuities[0];
    assert_eq!((only.chunk_a_index, only.severity), (2, Severity::High));
    assert_eq!(config.severity_labels.label(only.severity), "Severe");
}

#[test]
fn malformed_matrix_is_reported_cell_by_cell() {
    let payload: SimilarityPayload = load_fixture("similarity_malformed.json");
    let render = render_similarity(&payload, &EngineConfig::default());

    assert_eq!(render.skipped.len(), 4);
    assert!(matches!(
        render.skipped[0],
        MalformedInput::InvalidCell { row: 0, col: 2, .. }
    ));
    assert_eq!(
        render.skipped[1],
        MalformedInput::RaggedRow {
            row: 1,
            len: 2,
            expected: 3
        }
    );
    assert!(matches!(
        render.skipped[2],
        MalformedInput::InvalidCell { row: 2, col: 1, value } if value > 1.0
    ));
    assert_eq!(
        render.skipped[3],
        MalformedInput::ChunkIdMismatch { rows: 3, ids: 2 }
    );

    let report = &render.report;
    assert_eq!(report.size, 3);
    assert!(report.cells[0][2].is_none());
    assert!(report.cells[1][2].is_none());
    assert!(report.cells[2][1].is_none());
    assert!(render.discontinuities.is_empty());
}

// =============================================================================
// ANSWER
// =============================================================================

#[test]
fn answer_fixture_two_pass_places_out_of_order_flags() {
    let payload: AnswerPayload = load_fixture("answer.json");
    let render = render_answer(&payload, &EngineConfig::default());

    let located: Vec<(usize, usize, usize, &str)> = render
        .located
        .iter()
        .map(|l| (l.annotation, l.start, l.end, l.text.as_str()))
        .collect();
    assert_eq!(
        located,
        vec![
            (1, 46, 61, "500 meters tall"),
            (0, 114, 141, "repainted every seven years"),
        ]
    );
    assert_eq!(render.dropped.len(), 1);
    assert_eq!(render.dropped[0].annotation, 2);
    assert_eq!(render.dropped[0].cause, DropCause::NotFound);

    assert_tiles(&payload.answer, &render.segments);
    assert_eq!(
        texts_in(&render.segments, HALLUCINATION_COLLECTION),
        vec!["500 meters tall", "repainted every seven years"]
    );
    assert_eq!(render.quality, Some(0.42));
    assert_eq!(render.grade, Some(QualityGrade::Fair));
    assert!(render.skipped.is_empty());

    let json = serde_json::to_value(&render).unwrap();
    assert_eq!(json["skipped"], serde_json::json!([]));
}

#[test]
fn answer_fixture_greedy_loses_the_earlier_flag() {
    let payload: AnswerPayload = load_fixture("answer.json");
    let config = fixture_config();
    assert_eq!(config.locate.strategy, LocateStrategy::Greedy);
    let render = render_answer(&payload, &config);

    assert_eq!(render.located.len(), 1);
    assert_eq!(render.located[0].start, 114);
    let dropped: Vec<usize> = render.dropped.iter().map(|d| d.annotation).collect();
    assert_eq!(dropped, vec![1, 2]);
}

#[test]
fn answer_without_flags_is_one_plain_segment() {
    let payload = AnswerPayload {
        answer: "Nothing to see here.".to_string(),
        hallucinations: Vec::new(),
        quality: None,
    };
    let render = render_answer(&payload, &EngineConfig::default());
    assert_eq!(render.segments.len(), 1);
    assert!(render.segments[0].active_span_ids.is_empty());
    assert_eq!(render.grade, None);
}

// =============================================================================
// CONTEXT
// =============================================================================

#[test]
fn context_fixture_highlights_retrieved_chunks_by_rank() {
    let payload: ContextPayload = load_fixture("context.json");
    let render = render_context(&payload);

    assert_tiles(&payload.full_text, &render.segments);
    assert_eq!(render.segments.len(), 4);
    assert_eq!(
        render.skipped,
        vec![MalformedInput::UnknownChunk {
            chunk_id: "missing".to_string()
        }]
    );

    let placed: Vec<(&str, u64, &str)> = render
        .retrieved
        .iter()
        .map(|s| {
            (
                s.id.key.as_str(),
                s.metadata["rank"].as_u64().unwrap(),
                s.metadata["tier"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(placed, vec![("k2", 1, "first"), ("k0", 2, "second")]);
    assert_eq!(render.retrieved[0].metadata["label"], "#1");
    assert_eq!(render.retrieved[0].metadata["score"], 0.87);

    assert_eq!(
        texts_in(&render.segments, RETRIEVED_COLLECTION),
        vec!["Chunk zero talks about setup. ", "Chunk two lists errors. "]
    );
}

#[test]
fn retrieved_chunk_past_the_end_is_not_highlighted() {
    let mut payload: ContextPayload = load_fixture("context.json");
    payload.all_chunks[2].end = 500;
    let render = render_context(&payload);

    assert_tiles(&payload.full_text, &render.segments);
    let keys: Vec<&str> = render.retrieved.iter().map(|s| s.id.key.as_str()).collect();
    assert_eq!(keys, vec!["k0"]);
    assert!(render.skipped.contains(&MalformedInput::UnknownChunk {
        chunk_id: "k2".to_string()
    }));
    assert!(render
        .skipped
        .iter()
        .any(|skip| matches!(skip, MalformedInput::OutOfBounds { id, .. } if id == "chunk:k2")));
    assert_eq!(
        texts_in(&render.segments, RETRIEVED_COLLECTION),
        vec!["Chunk zero talks about setup. "]
    );
}
