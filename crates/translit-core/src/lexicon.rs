//! Lexicon-backed oracles.
//!
//! A lexicon is a small TOML word list plus per-character readings, supplied
//! by the caller. `LexiconSegmenter` segments by greedy longest match and
//! `LexiconPhonetic` renders stored numeric readings in any [`Style`].
//!
//! ```toml
//! [words]
//! "你好" = "l"
//! "世界" = "n"
//!
//! [readings]
//! "好" = ["hao3", "hao4"]
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::phonetic::{PhoneticOracle, Style};
use crate::segment::{Segmentation, Segmenter};
use crate::unicode::is_lexical_word;

/// Tag for single characters missing from the word list.
pub const UNKNOWN_POS: &str = "x";
/// Tag for runs of ASCII letters.
pub const LATIN_POS: &str = "eng";
/// Tag for runs of ASCII digits.
pub const NUMERAL_POS: &str = "m";

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("lexicon has no words and no readings")]
    Empty,
    #[error("reading key must be a single character: {0:?}")]
    InvalidKey(String),
    #[error("empty reading for {0:?}")]
    EmptyReading(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Lexicon {
    /// word → part-of-speech tag
    #[serde(default)]
    words: BTreeMap<String, String>,
    /// character → numeric readings, most frequent first
    #[serde(default)]
    readings: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    max_word_chars: usize,
}

impl Lexicon {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn pos(&self, word: &str) -> Option<&str> {
        self.words.get(word).map(String::as_str)
    }

    pub fn readings_of(&self, c: char) -> &[String] {
        let mut buf = [0u8; 4];
        self.readings
            .get(&*c.encode_utf8(&mut buf))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Parse and validate lexicon TOML.
pub fn parse_lexicon_toml(toml_str: &str) -> std::result::Result<Lexicon, LexiconError> {
    let mut lex: Lexicon =
        toml::from_str(toml_str).map_err(|e| LexiconError::Parse(e.to_string()))?;

    if lex.words.is_empty() && lex.readings.is_empty() {
        return Err(LexiconError::Empty);
    }
    for (key, values) in &lex.readings {
        if key.chars().count() != 1 {
            return Err(LexiconError::InvalidKey(key.clone()));
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            return Err(LexiconError::EmptyReading(key.clone()));
        }
    }
    lex.words.retain(|w, _| !w.is_empty());
    lex.max_word_chars = lex
        .words
        .keys()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0);
    Ok(lex)
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// Greedy longest-match segmenter.
///
/// Unmatched ASCII letter or digit runs become one word each, other unmatched
/// lexical characters become single-character words. Punctuation and
/// whitespace are not reported.
pub struct LexiconSegmenter {
    lexicon: Arc<Lexicon>,
    loaded: bool,
}

impl LexiconSegmenter {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn longest_match<'a>(&self, chunk: &'a str, chars: &[(usize, char)], i: usize) -> Option<(usize, &'a str)> {
        let max = self.lexicon.max_word_chars.min(chars.len() - i);
        (1..=max).rev().find_map(|len| {
            let word = slice(chunk, chars, i, i + len);
            self.lexicon.words.contains_key(word).then_some((len, word))
        })
    }
}

fn slice<'a>(chunk: &'a str, chars: &[(usize, char)], i: usize, j: usize) -> &'a str {
    let start = chars[i].0;
    let end = chars.get(j).map(|&(b, _)| b).unwrap_or(chunk.len());
    &chunk[start..end]
}

impl Segmenter for LexiconSegmenter {
    fn load(&mut self) -> Result<()> {
        if self.lexicon.word_count() == 0 {
            return Err(Error::Initialization("lexicon has no words".into()));
        }
        self.loaded = true;
        Ok(())
    }

    fn segment(&self, chunk: &str) -> Result<Segmentation> {
        if !self.loaded {
            return Err(Error::Oracle("segmenter used before load".into()));
        }
        let chars: Vec<(usize, char)> = chunk.char_indices().collect();
        let mut out = Segmentation::default();
        let mut push = |word: &str, pos: &str| {
            out.words.push(word.to_string());
            if is_lexical_word(word) {
                out.pos_tags.push(pos.to_string());
            }
        };

        let mut i = 0;
        while i < chars.len() {
            if let Some((len, word)) = self.longest_match(chunk, &chars, i) {
                push(word, self.lexicon.pos(word).unwrap_or(UNKNOWN_POS));
                i += len;
                continue;
            }
            let c = chars[i].1;
            if c.is_ascii_alphanumeric() {
                let digits = c.is_ascii_digit();
                let mut j = i + 1;
                while j < chars.len() && chars[j].1.is_ascii_alphanumeric() && chars[j].1.is_ascii_digit() == digits {
                    j += 1;
                }
                push(slice(chunk, &chars, i, j), if digits { NUMERAL_POS } else { LATIN_POS });
                i = j;
            } else if c.is_alphanumeric() {
                push(slice(chunk, &chars, i, i + 1), UNKNOWN_POS);
                i += 1;
            } else {
                i += 1;
            }
        }

        debug!(words = out.words.len());
        Ok(out)
    }

    fn unload(&mut self) {
        self.loaded = false;
    }
}

// ---------------------------------------------------------------------------
// Phonetic oracle
// ---------------------------------------------------------------------------

/// Per-character reading table.
pub struct LexiconPhonetic {
    lexicon: Arc<Lexicon>,
}

impl LexiconPhonetic {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl PhoneticOracle for LexiconPhonetic {
    fn readings(&self, text: &str, style: Style, heteronym: bool) -> Result<Vec<Vec<String>>> {
        Ok(text
            .chars()
            .map(|c| {
                let stored = self.lexicon.readings_of(c);
                let take = if heteronym { stored.len() } else { stored.len().min(1) };
                stored[..take].iter().map(|r| style.render(r)).collect()
            })
            .collect())
    }
}
