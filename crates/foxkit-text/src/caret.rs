//! Grapheme-cluster boundary helpers for caret motion.
//!
//! Caret positions are byte indices that always land on grapheme boundaries,
//! so arrow keys and backspace never split a combining sequence.

use unicode_segmentation::UnicodeSegmentation;

/// Largest grapheme boundary strictly before `idx` (0 when none).
pub fn prev_grapheme_boundary(text: &str, idx: usize) -> usize {
    let idx = idx.min(text.len());
    text.grapheme_indices(true)
        .map(|(i, _)| i)
        .take_while(|&i| i < idx)
        .last()
        .unwrap_or(0)
}

/// Smallest grapheme boundary strictly after `idx` (`text.len()` when none).
pub fn next_grapheme_boundary(text: &str, idx: usize) -> usize {
    let idx = idx.min(text.len());
    text.grapheme_indices(true)
        .map(|(i, _)| i)
        .find(|&i| i > idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_moves_one_byte() {
        assert_eq!(prev_grapheme_boundary("hello", 5), 4);
        assert_eq!(next_grapheme_boundary("hello", 0), 1);
        assert_eq!(prev_grapheme_boundary("hello", 0), 0);
        assert_eq!(next_grapheme_boundary("hello", 5), 5);
    }

    #[test]
    fn combining_marks_stay_together() {
        // "e" + COMBINING ACUTE ACCENT is one grapheme of three bytes.
        let s = "e\u{0301}x";
        assert_eq!(next_grapheme_boundary(s, 0), 3);
        assert_eq!(prev_grapheme_boundary(s, 3), 0);
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        assert_eq!(prev_grapheme_boundary("ab", 99), 1);
        assert_eq!(next_grapheme_boundary("ab", 99), 2);
    }
}
