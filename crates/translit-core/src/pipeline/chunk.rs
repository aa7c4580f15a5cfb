use crate::unicode::is_chunk_break;

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Cuts right after the last sentence break or whitespace inside the window
/// when there is one, otherwise at the window edge. Never splits a character.
/// `max_chars == 0` means no limit.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    let mut last_break: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if count == max_chars {
            let cut = last_break.filter(|&b| b > start).unwrap_or(i);
            chunks.push(text[start..cut].to_string());
            count = text[cut..i].chars().count();
            start = cut;
            last_break = last_break.filter(|&b| b > cut);
        }
        count += 1;
        if is_chunk_break(c) {
            last_break = Some(i + c.len_utf8());
        }
    }
    chunks.push(text[start..].to_string());
    chunks
}
