//! Partitioning with several collections at once.

use chunklens::{partition, MalformedInput, SpanCollection, TextBuffer};

use crate::common::{assert_tiles, make_chunks, make_span, texts_in};

#[test]
fn chunks_overlaps_and_flags_together() {
    let text = "abcdefghijklmnopqrstuvwxyz";
    let buffer = TextBuffer::new(text);
    let collections = [
        SpanCollection::new(
            "chunk",
            vec![make_span("chunk", "0", 0, 12), make_span("chunk", "1", 8, 26)],
        ),
        SpanCollection::new("overlap", vec![make_span("overlap", "0", 8, 12)]),
        SpanCollection::new("hallucination", vec![make_span("hallucination", "0", 10, 15)]),
    ];
    let result = partition(&buffer, &collections);

    assert_tiles(text, &result.segments);
    assert!(result.skipped.is_empty());
    assert_eq!(texts_in(&result.segments, "overlap"), vec!["ij", "kl"]);
    assert_eq!(texts_in(&result.segments, "hallucination"), vec!["kl", "mno"]);

    let boundary = &result.segments[2];
    assert_eq!((boundary.start, boundary.end), (10, 12));
    assert_eq!(boundary.active_span_ids.len(), 4);
}

#[test]
fn same_key_in_different_collections_is_not_a_duplicate() {
    let buffer = TextBuffer::new("0123456789");
    let collections = [
        SpanCollection::new("chunk", vec![make_span("chunk", "3", 0, 5)]),
        SpanCollection::new("retrieved", vec![make_span("retrieved", "3", 0, 5)]),
    ];
    let result = partition(&buffer, &collections);
    assert!(result.skipped.is_empty());
    assert_eq!(result.segments[0].active_span_ids.len(), 2);
}

#[test]
fn skipped_spans_are_reported_in_input_order() {
    let buffer = TextBuffer::new("short");
    let collections = [SpanCollection::new(
        "chunk",
        vec![make_span("chunk", "a", 0, 50), make_span("chunk", "b", 0, 5)],
    )];
    let result = partition(&buffer, &collections);
    assert_eq!(result.segments.len(), 1);
    assert_eq!(
        result.skipped,
        vec![MalformedInput::OutOfBounds {
            id: "chunk:a".to_string(),
            start: 0,
            end: 50,
            len: 5
        }]
    );
}

#[test]
fn thousands_of_chunks_partition_in_one_sweep() {
    let len = 300_000;
    let chunks = make_chunks(len, 90, 9);
    assert!(chunks.len() > 3_000);

    let text = "x".repeat(len);
    let buffer = TextBuffer::new(text.as_str());
    let spans = chunks.iter().map(|c| c.to_span("chunk")).collect();
    let result = partition(&buffer, &[SpanCollection::new("chunk", spans)]);

    assert_tiles(&text, &result.segments);
    assert!(result.skipped.is_empty());
    // Alternating single-chunk and overlap segments.
    assert!(result
        .segments
        .iter()
        .all(|s| (1..=2).contains(&s.active_span_ids.len())));
    assert_eq!(
        result.segments.iter().filter(|s| s.active_span_ids.len() == 2).count(),
        chunks.len() - 1
    );
}
