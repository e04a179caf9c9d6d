//! Utility functions for string processing.

/// Case-fold a single character without changing the character count.
///
/// `char::to_lowercase` can expand (`'İ'` becomes `"i̇"`), which would shift
/// every offset after it. When the lowercase form isn't exactly one
/// character, the original character is kept.
#[inline]
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Case-fold a string into a character vector, one entry per input character.
///
/// Index `i` of the result corresponds to character offset `i` of the input.
pub fn fold_chars(value: &str) -> Vec<char> {
    value.chars().map(fold_char).collect()
}

/// First position `p ≥ from` where `needle` occurs in `haystack`.
///
/// Both sides are expected to be folded already. An empty needle never
/// matches: a zero-width hit would pin the cursor in place.
pub fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    let first = *needle.first()?;
    if from > haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    let last_start = haystack.len() - needle.len();
    (from..=last_start).find(|&p| haystack[p] == first && haystack[p..p + needle.len()] == *needle)
}

/// Character count of `value`. Offsets everywhere in the crate use this unit.
#[inline]
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
