//! Tiling properties of the partitioner.
//!
//! For any buffer and any span collections, including malformed spans:
//! 1. **Tiling**: segments are contiguous, non-empty, and cover `[0, N)`
//! 2. **Round trip**: concatenated segment text equals the buffer
//! 3. **Membership**: a span id is active on a segment iff the span covers it
//! 4. **Accounting**: every input span is either accepted or skipped

use chunklens::{
    partition, validate_partition, IntervalIndex, Span, SpanCollection, SpanId, TextBuffer,
};
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zäöü東京 ]{0,80}").unwrap()
}

/// Raw (start, end) pairs, allowed to be inverted or past the end.
fn raw_spans() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..100, 0usize..100), 0..12)
}

fn collection(name: &str, raw: &[(usize, usize)]) -> SpanCollection {
    let spans = raw
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| Span::new(SpanId::new(name, (i % 8).to_string()), start, end))
        .collect();
    SpanCollection::new(name, spans)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_segments_tile_buffer(
        text in text_strategy(),
        a in raw_spans(),
        b in raw_spans(),
    ) {
        let buffer = TextBuffer::new(text.as_str());
        let collections = [collection("a", &a), collection("b", &b)];
        let result = partition(&buffer, &collections);

        prop_assert!(validate_partition(&buffer, &result.segments).is_ok());
        let joined: String = result.segments.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn prop_active_ids_match_coverage(
        text in text_strategy(),
        a in raw_spans(),
    ) {
        let buffer = TextBuffer::new(text.as_str());
        let result = partition(&buffer, &[collection("a", &a)]);

        for segment in &result.segments {
            for span in &result.spans {
                let covers = span.start <= segment.start && span.end >= segment.end && !span.is_empty();
                prop_assert_eq!(
                    segment.active_span_ids.contains(&span.id),
                    covers,
                    "span {} [{}, {}) vs segment [{}, {})",
                    span.id, span.start, span.end, segment.start, segment.end
                );
            }
        }
    }

    #[test]
    fn prop_every_span_is_accepted_or_skipped(
        text in text_strategy(),
        a in raw_spans(),
        b in raw_spans(),
    ) {
        let buffer = TextBuffer::new(text.as_str());
        let result = partition(&buffer, &[collection("a", &a), collection("b", &b)]);
        prop_assert_eq!(result.spans.len() + result.skipped.len(), a.len() + b.len());
        for span in &result.spans {
            prop_assert!(span.start <= span.end && span.end <= buffer.len());
        }
    }

    #[test]
    fn prop_no_spans_single_segment(text in text_strategy()) {
        let buffer = TextBuffer::new(text.as_str());
        let result = partition(&buffer, &[]);
        let expected = if buffer.is_empty() { 0 } else { 1 };
        prop_assert_eq!(result.segments.len(), expected);
    }

    #[test]
    fn prop_sweep_matches_containment(raw in raw_spans()) {
        let spans: Vec<Span> = raw
            .iter()
            .enumerate()
            .filter(|(_, &(a, b))| a != b)
            .map(|(i, &(a, b))| Span::new(SpanId::new("s", i.to_string()), a.min(b), a.max(b)))
            .collect();
        let index = IntervalIndex::build(&spans);
        let mut sweep = index.sweep();

        for pair in index.boundary_positions().windows(2) {
            let swept: Vec<&SpanId> = sweep.advance_to(pair[0]).into_iter().map(|s| &s.id).collect();
            let contained: Vec<&SpanId> = index
                .spans_containing(pair[0], pair[1])
                .into_iter()
                .map(|s| &s.id)
                .collect();
            prop_assert_eq!(swept, contained);
        }
    }
}
