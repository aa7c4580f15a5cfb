use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::pipeline::{capability, Context, Options, Provider, ProviderKind};
use crate::segment::{attach_pos_tags, integrate, Segmenter};
use crate::settings::settings;
use crate::token::{TokenExt, TokenSeq};

/// Creates the segmentation engine when the stage initializes.
pub type SegmenterFactory = Arc<dyn Fn() -> Box<dyn Segmenter> + Send + Sync>;

pub const TOKENIZER_NAME: &str = "zh-segmenter";

/// Tokenizer stage: segments each raw chunk and integrates the words with the
/// chunk text. Lexical tokens are marked as Chinese tokens so the pinyin
/// transliterator picks them up.
pub struct ZhTokenizer {
    factory: SegmenterFactory,
    engine: Option<Box<dyn Segmenter>>,
    max_input_length: usize,
}

impl ZhTokenizer {
    pub fn new(factory: SegmenterFactory) -> Self {
        Self {
            factory,
            engine: None,
            max_input_length: settings().zh.tokenizer_max_input_length,
        }
    }

    /// Override the per-chunk character limit; zero means unlimited.
    pub fn with_max_input_length(mut self, limit: usize) -> Self {
        self.max_input_length = limit;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    fn unload(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.unload();
            debug!("segmenter unloaded");
        }
    }
}

impl Provider for ZhTokenizer {
    fn name(&self) -> &str {
        TOKENIZER_NAME
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Tokenizer
    }

    fn capabilities(&self) -> &[&'static str] {
        &[capability::TOKENIZATION, capability::POS_TAGGING]
    }

    fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    fn configure(&mut self, _options: &Options) -> Result<()> {
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        if self.engine.is_some() {
            return Ok(());
        }
        let mut engine = (self.factory)();
        engine.load()?;
        self.engine = Some(engine);
        debug!("segmenter loaded");
        Ok(())
    }

    fn reinitialize(&mut self, fresh: bool) -> Result<()> {
        if fresh {
            self.unload();
        }
        self.initialize()
    }

    fn run(&mut self, ctx: &Context, mut seq: TokenSeq) -> Result<TokenSeq> {
        ctx.check()?;
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| Error::Initialization("segmenter not loaded".into()))?;

        let interval = settings().pipeline.cancel_check_interval;
        let chunks = std::mem::take(&mut seq.raw);
        let total = chunks.len();
        if total == 0 {
            ctx.report(0, 0);
            return Ok(seq);
        }

        for (i, chunk) in chunks.iter().enumerate() {
            if i % interval == 0 {
                ctx.check()?;
            }
            let chars = chunk.chars().count();
            if self.max_input_length > 0 && chars > self.max_input_length {
                return Err(Error::Config(format!(
                    "chunk of {chars} characters exceeds limit of {}",
                    self.max_input_length
                )));
            }

            let seg = engine.segment(chunk)?;
            let mut tokens = integrate(chunk, &seg.words);
            attach_pos_tags(&mut tokens, &seg.pos_tags)?;
            for token in tokens.iter_mut().filter(|t| t.is_lexical) {
                token.ext = TokenExt::Zh(Default::default());
            }
            seq.tokens.extend(tokens);
            ctx.report(i + 1, total);
        }
        ctx.report(total, total);
        Ok(seq)
    }

    fn release(&mut self) -> Result<()> {
        self.unload();
        Ok(())
    }
}

impl Drop for ZhTokenizer {
    fn drop(&mut self) {
        self.unload();
    }
}
