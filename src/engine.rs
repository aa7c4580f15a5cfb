use std::path::Path;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::lang::zh;
use crate::lexicon::{Lexicon, LexiconError, LexiconPhonetic, LexiconSegmenter};
use crate::pipeline::{Context, Mode, Pipeline};
use crate::registry::{Registry, RegistryError};
use crate::segment::Segmenter;
use crate::settings::SettingsError;
use crate::{Error, TokenSeq};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lexicon: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Pipeline(#[from] Error),
}

/// A frozen registry plus convenience entry points for one-shot runs.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<Registry>,
}

impl Engine {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Register the Chinese providers backed by `lexicon`.
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Result<Self, EngineError> {
        let seg_lexicon = Arc::clone(&lexicon);
        let segmenter: zh::SegmenterFactory = Arc::new(move || {
            Box::new(LexiconSegmenter::new(Arc::clone(&seg_lexicon))) as Box<dyn Segmenter>
        });
        let oracle = Arc::new(LexiconPhonetic::new(lexicon));
        let registry = zh::register(Registry::builder(), segmenter, oracle).build()?;
        Ok(Self::new(Arc::new(registry)))
    }

    pub fn open(lexicon_path: &Path) -> Result<Self, EngineError> {
        Self::with_lexicon(super::open_lexicon(lexicon_path)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// A fresh pipeline for `language`, configured for `scheme` when given.
    pub fn pipeline(&self, language: &str, scheme: Option<&str>) -> Result<Pipeline, EngineError> {
        let pipeline = match scheme {
            Some(s) => self.registry.pipeline_for_scheme(language, s)?,
            None => self.registry.default_pipeline(language)?,
        };
        Ok(pipeline)
    }

    /// Build a pipeline, run `text` through it and release it.
    pub fn transliterate(
        &self,
        ctx: &Context,
        language: &str,
        scheme: Option<&str>,
        mode: Mode,
        text: &str,
    ) -> Result<TokenSeq, EngineError> {
        let _span = debug_span!("transliterate", language, ?scheme, %mode).entered();
        let mut pipeline = self.pipeline(language, scheme)?;
        let result = pipeline.process_text(ctx, mode, text);
        let closed = pipeline.close(ctx);
        let seq = result?;
        closed?;
        debug!(tokens = seq.len());
        Ok(seq)
    }
}
