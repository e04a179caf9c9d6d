//! Properties of overlap resolution and chunk statistics.
//!
//! 1. **Containment**: every overlap region lies inside both of its chunks
//! 2. **Adjacency**: regions only join chunks with consecutive indexes
//! 3. **Order**: regions come out in ascending chunk index
//! 4. **Coverage**: sliding-window chunks over the whole text cover 100%

use chunklens::{resolve_overlaps, ChunkSpan, ChunkStatistics, TextBuffer};
use proptest::prelude::*;

use crate::common::{make_chunk, make_chunks};

/// Chunks with non-decreasing starts and arbitrary lengths, some empty.
fn chunk_layout() -> impl Strategy<Value = (usize, Vec<ChunkSpan>)> {
    prop::collection::vec((0usize..30, 0usize..60), 0..10).prop_map(|steps| {
        let mut start = 0;
        let chunks: Vec<ChunkSpan> = steps
            .iter()
            .enumerate()
            .map(|(i, &(advance, len))| {
                start += advance;
                make_chunk(&format!("c{}", i), i, start, start + len)
            })
            .collect();
        let len = chunks.iter().map(|c| c.end).max().unwrap_or(0);
        (len, chunks)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_overlaps_are_inside_both_chunks((len, chunks) in chunk_layout()) {
        let buffer = TextBuffer::new("x".repeat(len));
        let overlaps = resolve_overlaps(&buffer, &chunks);

        for region in &overlaps {
            let a = chunks.iter().find(|c| c.id == region.chunk_a_id).unwrap();
            let b = chunks.iter().find(|c| c.id == region.chunk_b_id).unwrap();
            prop_assert_eq!(b.index, a.index + 1);
            prop_assert!(region.start < region.end);
            prop_assert!(a.start <= region.start && region.end <= a.end);
            prop_assert!(b.start <= region.start && region.end <= b.end);
            prop_assert_eq!(region.text.chars().count(), region.len());
        }
        for pair in overlaps.windows(2) {
            prop_assert!(pair[0].chunk_a_index < pair[1].chunk_a_index);
        }
    }

    #[test]
    fn prop_overlap_found_iff_chunks_intersect((len, chunks) in chunk_layout()) {
        let buffer = TextBuffer::new("x".repeat(len));
        let overlaps = resolve_overlaps(&buffer, &chunks);
        let expected = chunks
            .windows(2)
            .filter(|p| p[1].start < p[0].end.min(p[1].end))
            .count();
        prop_assert_eq!(overlaps.len(), expected);
    }

    #[test]
    fn prop_sliding_window_covers_everything(
        len in 1usize..500,
        size in 1usize..80,
        overlap in 0usize..40,
    ) {
        let overlap = overlap.min(size - 1);
        let chunks = make_chunks(len, size, overlap);
        let buffer = TextBuffer::new("y".repeat(len));
        let overlaps = resolve_overlaps(&buffer, &chunks);
        let stats = ChunkStatistics::compute(&buffer, &chunks, &overlaps);

        prop_assert!((stats.coverage - 100.0).abs() < 1e-9);
        prop_assert_eq!(stats.total_chunks, chunks.len());
        prop_assert!(stats.max_chunk_size <= size);
        prop_assert!(stats.avg_overlap_size <= overlap as f64 + 1e-9);
    }
}
