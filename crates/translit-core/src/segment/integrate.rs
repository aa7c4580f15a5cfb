use tracing::{debug, debug_span};

use crate::error::{Error, Result};
use crate::token::Token;
use crate::unicode::is_lexical_word;

/// Merge a segmenter's word list with `chunk` into a loss-less token stream.
///
/// The chunk is scanned left to right. When the next word starts at the
/// cursor it becomes a lexical token; otherwise the characters up to the
/// word's next occurrence become filler. If a later word already starts at
/// the cursor, the words queued before it are dropped instead, so the text
/// at the cursor is never demoted to filler. A word that never occurs at or
/// after the cursor is dropped and scanning continues with the next one.
/// Words made only of punctuation or whitespace are folded into the
/// surrounding filler.
pub fn integrate(chunk: &str, words: &[String]) -> Vec<Token> {
    let _span = debug_span!("integrate", chunk_len = chunk.len(), words = words.len()).entered();

    let mut tokens = Vec::new();
    let mut filler = String::new();
    let mut cursor = 0;
    let queue: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| !w.is_empty())
        .collect();
    let mut next = 0;

    while cursor < chunk.len() && next < queue.len() {
        let word = queue[next];
        let rest = &chunk[cursor..];

        if rest.starts_with(word) {
            if is_lexical_word(word) {
                flush_filler(&mut tokens, &mut filler);
                tokens.push(Token::lexical(word));
            } else {
                filler.push_str(word);
            }
            cursor += word.len();
            next += 1;
            continue;
        }

        if let Some(ahead) = queue[next + 1..].iter().position(|w| rest.starts_with(w)) {
            debug!(word, dropped = ahead + 1, cursor, "later word matches at cursor");
            next += ahead + 1;
            continue;
        }

        match rest.find(word) {
            Some(offset) => {
                filler.push_str(&rest[..offset]);
                cursor += offset;
            }
            None => {
                debug!(word, cursor, "word not found in chunk, skipped");
                next += 1;
            }
        }
    }

    filler.push_str(&chunk[cursor..]);
    flush_filler(&mut tokens, &mut filler);

    debug!(token_count = tokens.len());
    tokens
}

fn flush_filler(tokens: &mut Vec<Token>, filler: &mut String) {
    if !filler.is_empty() {
        tokens.push(Token::filler(std::mem::take(filler)));
    }
}

/// Assign part-of-speech tags to lexical tokens, positionally.
///
/// The tag count must equal the lexical token count; anything else means the
/// alignment between words and tags is unreliable and the chunk is rejected.
pub fn attach_pos_tags(tokens: &mut [Token], tags: &[String]) -> Result<()> {
    let lexical = tokens.iter().filter(|t| t.is_lexical).count();
    if lexical != tags.len() {
        return Err(Error::Consistency(format!(
            "{} part-of-speech tags for {} lexical tokens",
            tags.len(),
            lexical
        )));
    }
    for (token, tag) in tokens.iter_mut().filter(|t| t.is_lexical).zip(tags) {
        token.pos = Some(tag.clone());
    }
    Ok(())
}
