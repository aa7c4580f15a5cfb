//! Stage sequencing with lazy initialization, cooperative cancellation and
//! progress reporting.
//!
//! A `Pipeline` owns its stage providers. `process` runs the stages selected
//! by the [`Mode`] in order, feeding each one's output to the next. Errors
//! from a stage are wrapped with the stage name and the failed operation and
//! abort the whole call; no partial output is returned.

mod chunk;
mod context;
mod provider;


pub use chunk::split_chunks;
pub use context::{CancelToken, Context, ProgressFn};
pub use provider::{capability, Options, Provider, ProviderKind, SCHEME_OPTION};

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::error::{Error, Result, StageOp};
use crate::settings::settings;
use crate::token::TokenSeq;

/// Which stages `process` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Tokenizer stages only: raw chunks in, tokens out.
    Tokenize,
    /// Transliterator stages only, over already tokenized input.
    Transliterate,
    /// Every stage, in order.
    Combined,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Mode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokenize" => Some(Mode::Tokenize),
            "transliterate" => Some(Mode::Transliterate),
            "combined" => Some(Mode::Combined),
            _ => None,
        }
    }

    fn runs(self, kind: ProviderKind) -> bool {
        match self {
            Mode::Tokenize => kind == ProviderKind::Tokenizer,
            Mode::Transliterate => kind == ProviderKind::Transliterator,
            Mode::Combined => true,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Tokenize => "tokenize",
            Mode::Transliterate => "transliterate",
            Mode::Combined => "combined",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageState {
    Fresh,
    Ready,
    Released,
}

struct Stage {
    provider: Box<dyn Provider>,
    state: StageState,
}

impl Stage {
    fn name(&self) -> String {
        self.provider.name().to_string()
    }

    fn ensure_initialized(&mut self) -> Result<()> {
        if self.state == StageState::Ready {
            return Ok(());
        }
        self.provider
            .initialize()
            .map_err(|e| Error::stage(self.provider.name(), StageOp::Initialize, e))?;
        self.state = StageState::Ready;
        Ok(())
    }
}

pub struct Pipeline {
    name: String,
    stages: Vec<Stage>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<String> = self.stages.iter().map(Stage::name).collect();
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &stages)
            .finish()
    }
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, provider: Box<dyn Provider>) -> Self {
        self.push_stage(provider);
        self
    }

    pub fn push_stage(&mut self, provider: Box<dyn Provider>) {
        self.stages.push(Stage {
            provider,
            state: StageState::Fresh,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.provider.name()).collect()
    }

    /// Modes derived from the stage kinds present.
    pub fn supported_modes(&self) -> BTreeSet<Mode> {
        let has = |k: ProviderKind| self.stages.iter().any(|s| s.provider.kind() == k);
        let tok = has(ProviderKind::Tokenizer);
        let tr = has(ProviderKind::Transliterator);
        let mut modes = BTreeSet::new();
        if tok {
            modes.insert(Mode::Tokenize);
        }
        if tr {
            modes.insert(Mode::Transliterate);
        }
        if tok && tr {
            modes.insert(Mode::Combined);
        }
        modes
    }

    /// Smallest non-zero stage limit, or the configured default.
    pub fn max_input_length(&self) -> usize {
        self.stages
            .iter()
            .map(|s| s.provider.max_input_length())
            .filter(|&n| n > 0)
            .min()
            .unwrap_or(settings().pipeline.default_max_input_length)
    }

    pub fn configure(&mut self, options: &Options) -> Result<()> {
        for stage in &mut self.stages {
            stage
                .provider
                .configure(options)
                .map_err(|e| Error::stage(stage.provider.name(), StageOp::Configure, e))?;
        }
        Ok(())
    }

    /// Initialize every stage. Stages already initialized are left alone.
    pub fn initialize(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()?;
        for stage in &mut self.stages {
            stage.ensure_initialized()?;
        }
        Ok(())
    }

    pub fn reinitialize(&mut self, ctx: &Context, fresh: bool) -> Result<()> {
        ctx.check()?;
        for stage in &mut self.stages {
            stage
                .provider
                .reinitialize(fresh)
                .map_err(|e| Error::stage(stage.provider.name(), StageOp::Initialize, e))?;
            stage.state = StageState::Ready;
        }
        Ok(())
    }

    /// Run the stages selected by `mode` over `seq`.
    pub fn process(&mut self, ctx: &Context, mode: Mode, seq: TokenSeq) -> Result<TokenSeq> {
        let _span = debug_span!("process", pipeline = self.name.as_str(), %mode).entered();
        ctx.check()?;

        if !self.supported_modes().contains(&mode) {
            return Err(Error::Config(format!(
                "pipeline {} does not support mode {mode}",
                self.name
            )));
        }
        if mode == Mode::Transliterate && !seq.raw.is_empty() {
            return Err(Error::Config(
                "raw chunks need a tokenizer stage; use tokenize or combined mode".into(),
            ));
        }

        let mut seq = seq;
        let mut base = 0;
        for stage in self.stages.iter_mut().filter(|s| mode.runs(s.provider.kind())) {
            stage.ensure_initialized()?;

            let stage_total = Arc::new(AtomicUsize::new(0));
            let stage_ctx = ctx.offset(base, Arc::clone(&stage_total));
            let _stage_span = debug_span!("stage", provider = stage.provider.name()).entered();
            seq = stage
                .provider
                .run(&stage_ctx, seq)
                .map_err(|e| Error::stage(stage.provider.name(), StageOp::Process, e))?;
            base += stage_total.load(Ordering::Relaxed);
            debug!(tokens = seq.tokens.len());
        }
        Ok(seq)
    }

    /// Chunk `text` by [`Pipeline::max_input_length`] and process it.
    pub fn process_text(&mut self, ctx: &Context, mode: Mode, text: &str) -> Result<TokenSeq> {
        let chunks = split_chunks(text, self.max_input_length());
        self.process(ctx, mode, TokenSeq::from_chunks(chunks))
    }

    /// Release every stage. All stages are released even if one fails; the
    /// first error is returned.
    pub fn close(&mut self, _ctx: &Context) -> Result<()> {
        let mut first_err = None;
        for stage in &mut self.stages {
            if stage.state == StageState::Released {
                continue;
            }
            match stage.provider.release() {
                Ok(()) => stage.state = StageState::Released,
                Err(e) => {
                    let e = Error::stage(stage.provider.name(), StageOp::Release, e);
                    first_err.get_or_insert(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
