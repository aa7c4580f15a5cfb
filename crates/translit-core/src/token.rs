//! Tokens produced by the tokenizer stage and annotated by transliterators.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One span of the source text.
///
/// Concatenating the `surface` of every token of a chunk, in order, gives the
/// chunk back exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    /// False for whitespace, punctuation and other filler.
    pub is_lexical: bool,
    /// Chosen output; empty until a transliterator has run.
    pub romanization: String,
    /// Part-of-speech tag from the segmenter (lexical tokens only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default)]
    pub ext: TokenExt,
}

/// Language-specific annotations, dispatched on by transliterators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenExt {
    /// Produced by a tokenizer with no language specialization.
    #[default]
    Generic,
    Zh(ZhReading),
}

/// Pinyin annotations for a Chinese token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZhReading {
    /// Chosen reading in the configured style, syllables joined by spaces.
    pub primary_reading: String,
    /// Chosen reading with tone numbers (`ni3 hao3`).
    pub primary_numeric: String,
    /// One candidate list per character, most frequent reading first.
    pub all_readings_by_character: Vec<Vec<String>>,
    /// Same shape as `all_readings_by_character`, numeric tone notation.
    pub numeric_reading_all: Vec<Vec<String>>,
    pub tone: Option<u8>,
    pub original_tone: Option<u8>,
    pub tone_sandhi_applied: bool,
}

impl Token {
    pub fn lexical(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            is_lexical: true,
            ..Default::default()
        }
    }

    pub fn filler(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            is_lexical: false,
            ..Default::default()
        }
    }

    pub fn with_ext(mut self, ext: TokenExt) -> Self {
        self.ext = ext;
        self
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    pub fn zh(&self) -> Option<&ZhReading> {
        match &self.ext {
            TokenExt::Zh(r) => Some(r),
            TokenExt::Generic => None,
        }
    }

    /// Mutable access to the Chinese annotations, or `UnsupportedToken` when
    /// this token came from a tokenizer without that specialization.
    pub fn zh_mut(&mut self) -> Result<&mut ZhReading> {
        match &mut self.ext {
            TokenExt::Zh(r) => Ok(r),
            TokenExt::Generic => Err(Error::UnsupportedToken { expected: "zh" }),
        }
    }

    /// Identity romanization: the surface, copied verbatim.
    pub fn romanize_identity(&mut self) {
        self.romanization.clone_from(&self.surface);
    }
}

/// The unit of work handed from stage to stage.
///
/// `raw` holds text chunks not yet tokenized; a tokenizer stage drains it
/// into `tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSeq {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw: Vec<String>,
    pub tokens: Vec<Token>,
}

impl TokenSeq {
    pub fn from_chunks(chunks: Vec<String>) -> Self {
        Self {
            raw: chunks,
            tokens: Vec::new(),
        }
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            raw: Vec::new(),
            tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surfaces concatenated: the reconstructed source text.
    pub fn surface(&self) -> String {
        self.tokens.iter().map(|t| t.surface.as_str()).collect()
    }

    /// Romanizations of lexical tokens joined by `sep`.
    pub fn romanized(&self, sep: &str) -> String {
        self.tokens
            .iter()
            .filter(|t| t.is_lexical)
            .map(|t| t.romanization.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }

    pub fn lexical_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_lexical).count()
    }
}
