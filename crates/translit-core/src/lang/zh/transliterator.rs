use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::phonetic::{resolve_token, PhoneticOracle, Style};
use crate::pipeline::{capability, Context, Options, Provider, ProviderKind, SCHEME_OPTION};
use crate::settings::settings;
use crate::token::TokenSeq;

pub const TRANSLITERATOR_NAME: &str = "zh-pinyin";

/// Transliterator stage: resolves a pinyin reading for every Chinese token.
pub struct ZhTransliterator {
    oracle: Arc<dyn PhoneticOracle>,
    style: Style,
    ready: bool,
}

impl ZhTransliterator {
    pub fn new(oracle: Arc<dyn PhoneticOracle>) -> Self {
        Self {
            oracle,
            style: Style::default(),
            ready: false,
        }
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

impl Provider for ZhTransliterator {
    fn name(&self) -> &str {
        TRANSLITERATOR_NAME
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Transliterator
    }

    fn capabilities(&self) -> &[&'static str] {
        &[
            capability::TRANSLITERATION,
            capability::HETERONYMS,
            capability::TONE,
        ]
    }

    fn configure(&mut self, options: &Options) -> Result<()> {
        if let Some(name) = options.get(SCHEME_OPTION) {
            self.style = Style::parse_or_default(name);
            debug!(style = %self.style, "configured");
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        self.ready = true;
        Ok(())
    }

    fn reinitialize(&mut self, _fresh: bool) -> Result<()> {
        self.initialize()
    }

    fn run(&mut self, ctx: &Context, mut seq: TokenSeq) -> Result<TokenSeq> {
        ctx.check()?;
        if !self.ready {
            return Err(Error::Initialization("transliterator not initialized".into()));
        }
        let interval = settings().pipeline.cancel_check_interval;
        let total = seq.tokens.len();
        if total == 0 {
            ctx.report(0, 0);
            return Ok(seq);
        }

        for (i, token) in seq.tokens.iter_mut().enumerate() {
            if i % interval == 0 {
                ctx.check()?;
            }
            resolve_token(self.oracle.as_ref(), self.style, token)?;
            ctx.report(i + 1, total);
        }
        ctx.report(total, total);
        Ok(seq)
    }

    fn release(&mut self) -> Result<()> {
        self.ready = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CancelReason;
    use crate::pipeline::CancelToken;
    use crate::testutil::{sample_phonetic, CountingOracle};
    use crate::token::{Token, TokenExt, ZhReading};

    fn zh(surface: &str) -> Token {
        Token::lexical(surface).with_ext(TokenExt::Zh(ZhReading::default()))
    }

    #[test]
    fn configure_scheme_option() {
        let mut tr = ZhTransliterator::new(Arc::new(sample_phonetic()));
        assert_eq!(tr.style(), Style::Tone);
        let opts = Options::from([(SCHEME_OPTION.to_string(), "tone3".to_string())]);
        tr.configure(&opts).unwrap();
        assert_eq!(tr.style(), Style::Tone3);
        let opts = Options::from([(SCHEME_OPTION.to_string(), "klingon".to_string())]);
        tr.configure(&opts).unwrap();
        assert_eq!(tr.style(), Style::Tone);
    }

    #[test]
    fn run_before_initialize_fails() {
        let mut tr = ZhTransliterator::new(Arc::new(sample_phonetic()));
        let err = tr
            .run(&Context::new(), TokenSeq::from_tokens(vec![zh("你好")]))
            .unwrap_err();
        assert!(matches!(err, Error::Initialization(_)));
    }

    #[test]
    fn run_resolves_in_place() {
        let mut tr = ZhTransliterator::new(Arc::new(sample_phonetic()));
        tr.initialize().unwrap();
        let seq = TokenSeq::from_tokens(vec![zh("你好"), Token::filler("，"), zh("世界")]);
        let out = tr.run(&Context::new(), seq).unwrap();
        assert_eq!(out.romanized(" "), "nǐ hǎo shì jiè");
        assert_eq!(out.tokens[1].romanization, "，");
        assert!(out.tokens[1].zh().is_none());
    }

    #[test]
    fn cancelled_before_any_oracle_call() {
        let oracle = Arc::new(CountingOracle::new(sample_phonetic()));
        let mut tr = ZhTransliterator::new(oracle.clone());
        tr.initialize().unwrap();
        let token = CancelToken::new();
        token.cancel();
        let ctx = Context::new().with_cancel(token);
        let err = tr
            .run(&ctx, TokenSeq::from_tokens(vec![zh("你好")]))
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(CancelReason::Requested)));
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn progress_reaches_total() {
        let mut tr = ZhTransliterator::new(Arc::new(sample_phonetic()));
        tr.initialize().unwrap();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ctx = Context::new().with_progress(move |p, t| sink.lock().unwrap().push((p, t)));
        let seq = TokenSeq::from_tokens(vec![zh("你好"), zh("吗"), zh("世界")]);
        tr.run(&ctx, seq).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3), (3, 3)]);
    }
}
