//! Word boundary detection over character offsets.
//!
//! Used for word-snapping selections and double-click word selection.

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos`, skipping separators first.
pub fn find_word_start(chars: &[char], pos: usize) -> usize {
    let mut idx = pos.min(chars.len());
    while idx > 0 && !is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    while idx > 0 && is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    idx
}

/// End of the word after `pos`, skipping separators first.
pub fn find_word_end(chars: &[char], pos: usize) -> usize {
    let len = chars.len();
    let mut idx = pos.min(len);
    while idx < len && !is_word_char(chars[idx]) {
        idx += 1;
    }
    while idx < len && is_word_char(chars[idx]) {
        idx += 1;
    }
    idx
}

/// The word (start, end) around `pos`. On a separator with no word directly
/// before it the range collapses to `pos`.
pub fn find_word_boundaries(chars: &[char], pos: usize) -> (usize, usize) {
    let pos = pos.min(chars.len());
    let on_word = chars.get(pos).copied().is_some_and(is_word_char);
    let after_word = pos > 0 && is_word_char(chars[pos - 1]);
    if !on_word && !after_word {
        return (pos, pos);
    }

    let mut start = pos;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = pos;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn word_start_and_end() {
        let text = chars("hello world");
        assert_eq!(find_word_start(&text, 6), 0);
        assert_eq!(find_word_start(&text, 11), 6);
        assert_eq!(find_word_end(&text, 0), 5);
        assert_eq!(find_word_end(&text, 6), 11);
    }

    #[test]
    fn boundaries_around_position() {
        let text = chars("hello world");
        assert_eq!(find_word_boundaries(&text, 2), (0, 5));
        assert_eq!(find_word_boundaries(&text, 8), (6, 11));
        assert_eq!(find_word_boundaries(&text, 5), (0, 5));
        assert_eq!(find_word_boundaries(&chars("a  b"), 2), (2, 2));
    }

    #[test]
    fn non_ascii_words() {
        let text = chars("héllo wörld");
        assert_eq!(find_word_boundaries(&text, 8), (6, 11));
    }
}
