//! Segmentation integration and phonetic resolution for Chinese text.
//!
//! Raw text flows through a [`pipeline::Pipeline`] of providers: a tokenizer
//! stage reconciles a segmenter's word list with the source text, and a
//! transliterator stage resolves pinyin readings for every lexical token.
//! Providers are discovered through a frozen [`registry::Registry`].

pub mod error;
pub mod lang;
pub mod lexicon;
pub mod phonetic;
pub mod pipeline;
pub mod registry;
pub mod segment;
pub mod settings;
pub mod token;
pub mod unicode;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Result};
pub use token::{Token, TokenExt, TokenSeq, ZhReading};
