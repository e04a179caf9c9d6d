// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Placing evaluator annotations back into generated text.
//!
//! The evaluator hands back hallucinations as literal strings with a reason,
//! never as offsets. It also doesn't promise any order, and sometimes the
//! text it quotes is a paraphrase of what the model actually wrote. So the
//! locator has to find each quote in the answer, once, left to right, and
//! give up gracefully when it can't.
//!
//! # Two-pass location (default)
//!
//! 1. **Probe**: find each annotation case-insensitively from offset 0. This
//!    position only decides processing order.
//! 2. **Order**: stable sort by probe position. An annotation whose probe
//!    failed inherits the key of the annotation before it in input order;
//!    with nothing before it, it's dropped.
//! 3. **Confirm**: walk a cursor from 0. Search each annotation from the
//!    cursor; on a hit emit the span and move the cursor to its end, on a
//!    miss drop the annotation.
//!
//! The `Greedy` strategy skips steps 1-2 and confirms in input order.
//!
//! **Invariant**: located spans are strictly increasing in `start` and never
//! overlap. The cursor only moves forward, so this holds by construction.
//!
//! **Verified by**: `prop_located_spans_are_monotonic`
//! (tests/property/locate_props.rs)

use serde::{Deserialize, Serialize};

use crate::types::{
    AnnotationSpan, DropCause, DroppedAnnotation, LocatedSpan, Span, SpanId, TextBuffer,
};
use crate::utils::{find_from, fold_chars};
use crate::verify::contracts::check_located_monotonic;

/// How annotations are ordered before the confirming scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocateStrategy {
    /// Probe from 0, sort by probe position, then confirm with a cursor.
    #[default]
    TwoPass,
    /// Confirm with a cursor in input order.
    Greedy,
}

/// Outcome of locating a batch of annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Located {
    pub spans: Vec<LocatedSpan>,
    pub dropped: Vec<DroppedAnnotation>,
}

impl Located {
    /// The located spans as a partition collection.
    ///
    /// Keys are the annotation's input position, so they're stable across
    /// strategies.
    pub fn to_spans(&self, collection: &str) -> Vec<Span> {
        self.spans
            .iter()
            .map(|located| {
                Span::new(
                    SpanId::new(collection, located.annotation.to_string()),
                    located.start,
                    located.end,
                )
                .with_meta("reason", located.reason.as_str())
            })
            .collect()
    }
}

/// An annotation ready for searching.
struct Needle<'a> {
    annotation: usize,
    source: &'a AnnotationSpan,
    folded: Vec<char>,
}

/// Locate every annotation in `answer`.
pub fn locate_annotations(
    answer: &TextBuffer,
    annotations: &[AnnotationSpan],
    strategy: LocateStrategy,
) -> Located {
    let haystack = fold_chars(answer.as_str());
    let mut dropped = Vec::new();

    let mut needles: Vec<Needle<'_>> = Vec::with_capacity(annotations.len());
    for (annotation, source) in annotations.iter().enumerate() {
        if source.text.trim().is_empty() {
            dropped.push(dropped_entry(annotation, source, DropCause::EmptyText));
            continue;
        }
        needles.push(Needle {
            annotation,
            source,
            folded: fold_chars(&source.text),
        });
    }

    if strategy == LocateStrategy::TwoPass {
        needles = order_by_probe(&haystack, needles, &mut dropped);
    }

    let mut spans = Vec::with_capacity(needles.len());
    let mut cursor = 0;
    for needle in needles {
        match find_from(&haystack, &needle.folded, cursor) {
            Some(start) => {
                let end = start + needle.folded.len();
                spans.push(LocatedSpan {
                    start,
                    end,
                    text: answer.slice_clamped(start, end).to_string(),
                    reason: needle.source.reason.clone(),
                    annotation: needle.annotation,
                });
                cursor = end;
            }
            None => dropped.push(dropped_entry(needle.annotation, needle.source, DropCause::NotFound)),
        }
    }

    dropped.sort_by_key(|d| d.annotation);
    for d in &dropped {
        tracing::warn!(
            annotation = d.annotation,
            cause = ?d.cause,
            text = %d.text,
            "annotation could not be placed in answer"
        );
    }
    check_located_monotonic(&spans);

    Located { spans, dropped }
}

/// Steps 1-2: probe from 0 and stable-sort by the probe position.
fn order_by_probe<'a>(
    haystack: &[char],
    needles: Vec<Needle<'a>>,
    dropped: &mut Vec<DroppedAnnotation>,
) -> Vec<Needle<'a>> {
    let mut keyed: Vec<(usize, Needle<'a>)> = Vec::with_capacity(needles.len());
    let mut previous_key: Option<usize> = None;

    for needle in needles {
        let key = match find_from(haystack, &needle.folded, 0) {
            Some(pos) => pos,
            // Not found from 0 means not found from any cursor either; the
            // inherited key only fixes where it sits in the order.
            None => match previous_key {
                Some(key) => key,
                None => {
                    dropped.push(dropped_entry(needle.annotation, needle.source, DropCause::NotFound));
                    continue;
                }
            },
        };
        previous_key = Some(key);
        keyed.push((key, needle));
    }

    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, needle)| needle).collect()
}

fn dropped_entry(annotation: usize, source: &AnnotationSpan, cause: DropCause) -> DroppedAnnotation {
    DroppedAnnotation {
        annotation,
        text: source.text.clone(),
        cause,
    }
}
