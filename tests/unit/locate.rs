//! Locator behavior on answer text shaped like real evaluator output.

use chunklens::{locate_annotations, DropCause, LocateStrategy, TextBuffer};

use crate::common::make_annotation;

#[test]
fn paraphrased_annotation_is_dropped_and_others_survive() {
    let answer = TextBuffer::new(
        "The Eiffel Tower was completed in 1889. It is 500 meters tall and repainted every seven years.",
    );
    let annotations = vec![
        make_annotation("repainted every seven years"),
        make_annotation("about 500m tall"),
        make_annotation("500 meters tall"),
    ];
    let located = locate_annotations(&answer, &annotations, LocateStrategy::TwoPass);

    let placed: Vec<usize> = located.spans.iter().map(|s| s.annotation).collect();
    assert_eq!(placed, vec![2, 0]);
    assert_eq!(located.dropped.len(), 1);
    assert_eq!(located.dropped[0].annotation, 1);
    assert_eq!(located.dropped[0].cause, DropCause::NotFound);
}

#[test]
fn unfound_annotation_rides_behind_its_predecessor() {
    // "zzz" inherits the key of "gamma" and is dropped in the confirming
    // scan without disturbing "alpha".
    let answer = TextBuffer::new("alpha beta gamma");
    let annotations = vec![
        make_annotation("gamma"),
        make_annotation("zzz"),
        make_annotation("alpha"),
    ];
    let located = locate_annotations(&answer, &annotations, LocateStrategy::TwoPass);
    let placed: Vec<(usize, usize)> = located.spans.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(placed, vec![(0, 5), (11, 16)]);
    assert_eq!(located.dropped.len(), 1);
    assert_eq!(located.dropped[0].text, "zzz");
}

#[test]
fn greedy_and_two_pass_agree_on_ordered_input() {
    let answer = TextBuffer::new("one two three four");
    let annotations = vec![make_annotation("two"), make_annotation("four")];
    let two_pass = locate_annotations(&answer, &annotations, LocateStrategy::TwoPass);
    let greedy = locate_annotations(&answer, &annotations, LocateStrategy::Greedy);
    assert_eq!(two_pass, greedy);
}

#[test]
fn multibyte_answer_offsets_are_characters() {
    let answer = TextBuffer::new("東京は日本の首都です。人口は約1400万人。");
    let located = locate_annotations(&answer, &[make_annotation("約1400万人")], LocateStrategy::TwoPass);
    assert_eq!(located.spans.len(), 1);
    let span = &located.spans[0];
    assert_eq!(answer.slice(span.start, span.end), Some("約1400万人"));
    assert_eq!(span.start, 14);
}
