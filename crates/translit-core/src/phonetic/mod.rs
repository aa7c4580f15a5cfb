//! Phonetic oracle boundary, pinyin output styles, and per-token resolution.

mod resolver;
pub mod style;

pub use resolver::{extract_tone, resolve_surface, resolve_token};
pub use style::Style;

use crate::error::Result;

/// An external source of character readings.
pub trait PhoneticOracle: Send + Sync {
    /// One ordered candidate list per character of `text`, most frequent
    /// reading first. With `heteronym == false` each list holds at most the
    /// top candidate. Unknown characters yield an empty list.
    fn readings(&self, text: &str, style: Style, heteronym: bool) -> Result<Vec<Vec<String>>>;
}
