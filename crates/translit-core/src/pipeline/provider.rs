use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::token::TokenSeq;

use super::Context;

/// Option map passed to `configure`. Providers ignore keys they don't know.
pub type Options = BTreeMap<String, String>;

/// Option key selecting the romanization style of a transliterator.
pub const SCHEME_OPTION: &str = "scheme";

pub mod capability {
    pub const TOKENIZATION: &str = "tokenization";
    pub const POS_TAGGING: &str = "pos-tagging";
    pub const TRANSLITERATION: &str = "transliteration";
    pub const HETERONYMS: &str = "heteronyms";
    pub const TONE: &str = "tone";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Tokenizer,
    Transliterator,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokenizer => "tokenizer",
            Self::Transliterator => "transliterator",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage of a pipeline.
///
/// `initialize` is idempotent once it has succeeded; `release` frees any
/// engine handle and is a no-op when nothing is held. `run` checks the
/// context's cancellation signal on entry and at least every
/// `pipeline.cancel_check_interval` items, and reports progress per item.
pub trait Provider: Send {
    fn name(&self) -> &str;
    fn kind(&self) -> ProviderKind;
    fn capabilities(&self) -> &[&'static str];
    /// Largest chunk, in characters, `run` accepts. 0 = no limit.
    fn max_input_length(&self) -> usize {
        0
    }
    fn configure(&mut self, options: &Options) -> Result<()>;
    fn initialize(&mut self) -> Result<()>;
    /// With `fresh`, drop existing state and start over; otherwise behave
    /// like `initialize`.
    fn reinitialize(&mut self, fresh: bool) -> Result<()>;
    fn run(&mut self, ctx: &Context, seq: TokenSeq) -> Result<TokenSeq>;
    fn release(&mut self) -> Result<()>;
}
