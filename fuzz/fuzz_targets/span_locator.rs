// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the annotation locator.
//!
//! Annotations are mostly cut out of the answer itself (with their case
//! flipped), plus some pure noise, so both the found and not-found paths get
//! exercised on arbitrary Unicode.

#![no_main]

use libfuzzer_sys::fuzz_target;

use chunklens::{
    locate_annotations, validate_located, AnnotationSpan, LocateStrategy, TextBuffer,
};

#[derive(Debug, Clone)]
struct LocatorInput {
    answer: String,
    annotations: Vec<AnnotationSpan>,
    strategy: LocateStrategy,
}

impl<'a> arbitrary::Arbitrary<'a> for LocatorInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let answer: String = u.arbitrary()?;
        let chars: Vec<char> = answer.chars().collect();

        let count = u.int_in_range(0..=8)?;
        let mut annotations = Vec::with_capacity(count);
        for _ in 0..count {
            let text = match u.int_in_range(0..=3)? {
                // Slice of the answer, case flipped
                0 | 1 if !chars.is_empty() => {
                    let start = u.int_in_range(0..=chars.len() - 1)?;
                    let end = u.int_in_range(start..=chars.len())?;
                    chars[start..end]
                        .iter()
                        .map(|c| {
                            if c.is_lowercase() {
                                c.to_uppercase().next().unwrap_or(*c)
                            } else {
                                *c
                            }
                        })
                        .collect()
                }
                // Whitespace only
                2 => " ".repeat(u.int_in_range(0..=3)?),
                // Noise
                _ => u.arbitrary()?,
            };
            annotations.push(AnnotationSpan::new(text, "fuzz"));
        }

        let strategy = if u.arbitrary()? {
            LocateStrategy::TwoPass
        } else {
            LocateStrategy::Greedy
        };
        Ok(LocatorInput {
            answer,
            annotations,
            strategy,
        })
    }
}

/// Tests critical invariants:
/// - INVARIANT 1: Every annotation is either located or dropped, never both
/// - INVARIANT 2: Located spans are in range, ordered, and disjoint
/// - INVARIANT 3: Located text is the buffer slice at its offsets
/// - INVARIANT 4: Located text matches the annotation case-insensitively in length
fuzz_target!(|input: LocatorInput| {
    let buffer = TextBuffer::new(input.answer.as_str());
    let located = locate_annotations(&buffer, &input.annotations, input.strategy);

    // INVARIANT 1
    let mut seen: Vec<usize> = located
        .spans
        .iter()
        .map(|s| s.annotation)
        .chain(located.dropped.iter().map(|d| d.annotation))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..input.annotations.len()).collect::<Vec<_>>());

    // INVARIANT 2
    if let Err(e) = validate_located(buffer.len(), &located.spans) {
        panic!("located spans invalid for {:?}: {}", input.answer, e);
    }

    for span in &located.spans {
        // INVARIANT 3
        assert_eq!(buffer.slice(span.start, span.end), Some(span.text.as_str()));

        // INVARIANT 4
        let annotation = &input.annotations[span.annotation];
        assert_eq!(span.end - span.start, annotation.text.chars().count());
    }
});
