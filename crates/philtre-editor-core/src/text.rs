//! Text helpers shared by extraction and restoration.

/// Non-breaking space, inserted by contenteditable surfaces for trailing
/// and doubled spaces.
pub const NBSP: char = '\u{a0}';

/// Normalize editing-surface whitespace artifacts to regular spaces.
pub fn sanitize_text(text: &str) -> String {
    text.replace(NBSP, " ")
}

/// Length in UTF-16 code units, the unit of DOM offsets.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Clamp a DOM offset into `0..=len` of the given text.
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    offset.min(utf16_len(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_every_nbsp() {
        assert_eq!(sanitize_text("a\u{a0}b\u{a0}\u{a0}c"), "a b  c");
        assert_eq!(sanitize_text("plain"), "plain");
    }

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("abc"), 3);
        // Astral plane chars are surrogate pairs.
        assert_eq!(utf16_len("a😀"), 3);
        assert_eq!(utf16_len(""), 0);
    }

    #[test]
    fn test_clamp_offset() {
        assert_eq!(clamp_offset("hello", 3), 3);
        assert_eq!(clamp_offset("hello", 9), 5);
        assert_eq!(clamp_offset("", 1), 0);
    }
}
