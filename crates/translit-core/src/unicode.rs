//! Character-level Unicode classification for Chinese text.

/// Han ideographs: CJK Unified Ideographs, Extension A, Compatibility
/// Ideographs and Extension B.
pub fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

/// True when `s` is non-empty and every character is a Han ideograph.
pub fn is_han_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_han)
}

/// A word is lexical when it carries at least one letter, digit or ideograph.
/// Spans made only of punctuation, symbols or whitespace are filler.
pub fn is_lexical_word(s: &str) -> bool {
    s.chars().any(char::is_alphanumeric)
}

/// Characters after which a chunk boundary is preferred.
pub fn is_chunk_break(c: char) -> bool {
    matches!(
        c,
        '。' | '！' | '？' | '；' | '…' | '.' | '!' | '?' | ';' | '\n'
    ) || c.is_whitespace()
}
