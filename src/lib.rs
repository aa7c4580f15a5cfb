//! Chinese transliteration engine.
//!
//! Re-exports the core pipeline and adds file loading, a ready-made
//! [`Engine`] wired to lexicon-backed oracles, and tracing setup.

mod engine;
mod resources;
pub mod trace_init;


pub use engine::{Engine, EngineError};
pub use resources::{load_settings, open_lexicon};
pub use translit_core::{
    error, lang, lexicon, phonetic, pipeline, registry, segment, settings, token, unicode,
};
pub use translit_core::{Error, Result, Token, TokenExt, TokenSeq, ZhReading};

pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
