//! Properties of the annotation locator.
//!
//! 1. **Monotonic cursor**: located spans are strictly increasing and never
//!    overlap, for both strategies
//! 2. **Faithful text**: each located span's text is the answer's own text at
//!    its offsets and matches the annotation ignoring case
//! 3. **Accounting**: every annotation is located or dropped, exactly once

use chunklens::{locate_annotations, validate_located, AnnotationSpan, LocateStrategy, TextBuffer};
use proptest::prelude::*;

use crate::common::make_annotation;

fn answer_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["the", "The", "sky", "SKY", "is", "blue", "ist", "Blau", "42", "ÉTÉ", "été"]),
        0..20,
    )
    .prop_map(|words| words.join(" "))
}

/// Annotations drawn from the answer's own words plus a few strays.
fn annotations_for(answer: &str) -> impl Strategy<Value = Vec<AnnotationSpan>> {
    let words: Vec<String> = answer.split(' ').map(str::to_string).collect();
    let mut pool = vec!["green".to_string(), "sky is".to_string(), "".to_string()];
    pool.extend(words.windows(2).map(|w| w.join(" ")));
    pool.extend(words);
    prop::collection::vec(prop::sample::select(pool), 0..8)
        .prop_map(|texts| texts.iter().map(|t| make_annotation(t)).collect())
}

fn strategy_strategy() -> impl Strategy<Value = LocateStrategy> {
    prop_oneof![Just(LocateStrategy::TwoPass), Just(LocateStrategy::Greedy)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_located_spans_are_monotonic(
        (answer, annotations) in answer_strategy().prop_flat_map(|a| {
            let anns = annotations_for(&a);
            (Just(a), anns)
        }),
        strategy in strategy_strategy(),
    ) {
        let buffer = TextBuffer::new(answer.as_str());
        let located = locate_annotations(&buffer, &annotations, strategy);
        prop_assert!(validate_located(buffer.len(), &located.spans).is_ok());
        for pair in located.spans.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn prop_located_text_is_faithful(
        (answer, annotations) in answer_strategy().prop_flat_map(|a| {
            let anns = annotations_for(&a);
            (Just(a), anns)
        }),
    ) {
        let buffer = TextBuffer::new(answer.as_str());
        let located = locate_annotations(&buffer, &annotations, LocateStrategy::TwoPass);
        for span in &located.spans {
            prop_assert_eq!(buffer.slice(span.start, span.end), Some(span.text.as_str()));
            let wanted = &annotations[span.annotation].text;
            prop_assert_eq!(span.text.to_lowercase(), wanted.to_lowercase());
        }
    }

    #[test]
    fn prop_every_annotation_accounted_for(
        (answer, annotations) in answer_strategy().prop_flat_map(|a| {
            let anns = annotations_for(&a);
            (Just(a), anns)
        }),
        strategy in strategy_strategy(),
    ) {
        let buffer = TextBuffer::new(answer.as_str());
        let located = locate_annotations(&buffer, &annotations, strategy);
        let mut seen: Vec<usize> = located
            .spans
            .iter()
            .map(|s| s.annotation)
            .chain(located.dropped.iter().map(|d| d.annotation))
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..annotations.len()).collect::<Vec<_>>());
    }
}
