//! Segmentation oracle boundary and integration of its output with the
//! source text.
//!
//! A `Segmenter` reports the lexical words of a chunk but is free to omit the
//! punctuation and whitespace between them. [`integrate`] walks the chunk and
//! the word list together and fills every gap with filler tokens, so no
//! character is ever lost.

mod integrate;

pub use integrate::{attach_pos_tags, integrate};

use crate::error::Result;

/// Output of one segmentation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Words in text order; each expected to occur in the chunk.
    pub words: Vec<String>,
    /// One tag per lexical word (see [`crate::unicode::is_lexical_word`]).
    pub pos_tags: Vec<String>,
}

/// An external word segmenter. Internals (dictionary, statistical model) are
/// opaque; the engine handle it holds is owned by exactly one stage.
pub trait Segmenter: Send {
    /// Start the engine. Called once per stage initialization.
    fn load(&mut self) -> Result<()>;
    fn segment(&self, chunk: &str) -> Result<Segmentation>;
    /// Release the engine. Must tolerate being called when not loaded.
    fn unload(&mut self);
}
