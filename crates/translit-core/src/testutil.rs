//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result, StageOp};
use crate::lexicon::{parse_lexicon_toml, Lexicon, LexiconPhonetic, LexiconSegmenter};
use crate::phonetic::{PhoneticOracle, Style};
use crate::pipeline::{Context, Options, Provider, ProviderKind};
use crate::segment::{Segmentation, Segmenter};
use crate::token::{Token, TokenSeq};

pub const SAMPLE_LEXICON: &str = r#"
[words]
"你好" = "l"
"吗" = "y"
"世界" = "n"
"中国" = "ns"
"很" = "d"
"大" = "a"

[readings]
"你" = ["ni3"]
"好" = ["hao3", "hao4"]
"吗" = ["ma5", "ma2"]
"世" = ["shi4"]
"界" = ["jie4"]
"中" = ["zhong1", "zhong4"]
"国" = ["guo2"]
"很" = ["hen3"]
"大" = ["da4", "dai4"]
"行" = ["xing2", "hang2"]
"长" = ["zhang3", "chang2"]
"绿" = ["lv4"]
"#;

pub fn sample_lexicon() -> Arc<Lexicon> {
    Arc::new(parse_lexicon_toml(SAMPLE_LEXICON).unwrap())
}

pub fn sample_phonetic() -> LexiconPhonetic {
    LexiconPhonetic::new(sample_lexicon())
}

/// Wraps an oracle and counts `readings` calls.
pub struct CountingOracle<O> {
    inner: O,
    calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<O: PhoneticOracle> PhoneticOracle for CountingOracle<O> {
    fn readings(&self, text: &str, style: Style, heteronym: bool) -> Result<Vec<Vec<String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.readings(text, style, heteronym)
    }
}

/// Returns canned lists: `numeric` for `Style::Tone3`, `display` otherwise.
pub struct FixedOracle {
    pub display: Vec<Vec<String>>,
    pub numeric: Vec<Vec<String>>,
}

impl PhoneticOracle for FixedOracle {
    fn readings(&self, _text: &str, style: Style, _heteronym: bool) -> Result<Vec<Vec<String>>> {
        Ok(match style {
            Style::Tone3 => self.numeric.clone(),
            _ => self.display.clone(),
        })
    }
}

/// Shared counters observed by tests after the segmenter has been moved
/// into a stage.
#[derive(Debug, Clone, Default)]
pub struct SegmenterProbe {
    pub loads: Arc<AtomicUsize>,
    pub segments: Arc<AtomicUsize>,
    pub unloads: Arc<AtomicUsize>,
}

impl SegmenterProbe {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn segments(&self) -> usize {
        self.segments.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }
}

/// Lexicon segmenter reporting to a [`SegmenterProbe`].
pub struct ProbedSegmenter {
    inner: LexiconSegmenter,
    probe: SegmenterProbe,
}

impl ProbedSegmenter {
    pub fn new(probe: SegmenterProbe) -> Self {
        Self {
            inner: LexiconSegmenter::new(sample_lexicon()),
            probe,
        }
    }
}

impl Segmenter for ProbedSegmenter {
    fn load(&mut self) -> Result<()> {
        self.probe.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load()
    }

    fn segment(&self, chunk: &str) -> Result<Segmentation> {
        self.probe.segments.fetch_add(1, Ordering::SeqCst);
        self.inner.segment(chunk)
    }

    fn unload(&mut self) {
        if self.inner.is_loaded() {
            self.probe.unloads.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.unload();
    }
}

/// Segmenter returning the same canned output for every chunk.
pub struct ScriptedSegmenter {
    pub output: Segmentation,
}

impl ScriptedSegmenter {
    pub fn new(words: &[&str], tags: &[&str]) -> Self {
        Self {
            output: Segmentation {
                words: words.iter().map(|w| w.to_string()).collect(),
                pos_tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        }
    }
}

impl Segmenter for ScriptedSegmenter {
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn segment(&self, _chunk: &str) -> Result<Segmentation> {
        Ok(self.output.clone())
    }

    fn unload(&mut self) {}
}

/// Minimal provider for exercising pipeline sequencing.
///
/// As a tokenizer it turns each raw chunk into one lexical token; as a
/// transliterator it upper-cases surfaces. It can be told to fail one
/// operation and counts lifecycle calls.
pub struct StubProvider {
    pub name: String,
    pub kind: ProviderKind,
    pub max_input_length: usize,
    pub fail_on: Option<StageOp>,
    pub initializations: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub configured: Arc<std::sync::Mutex<Options>>,
}

impl StubProvider {
    pub fn new(name: &str, kind: ProviderKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            max_input_length: 0,
            fail_on: None,
            initializations: Arc::default(),
            releases: Arc::default(),
            configured: Arc::default(),
        }
    }

    pub fn failing(mut self, op: StageOp) -> Self {
        self.fail_on = Some(op);
        self
    }

    fn fail(&self, op: StageOp) -> Result<()> {
        if self.fail_on == Some(op) {
            return Err(Error::Oracle(format!("{} refused {op}", self.name)));
        }
        Ok(())
    }
}

impl Provider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn capabilities(&self) -> &[&'static str] {
        &[]
    }

    fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    fn configure(&mut self, options: &Options) -> Result<()> {
        self.fail(StageOp::Configure)?;
        *self.configured.lock().unwrap() = options.clone();
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        self.fail(StageOp::Initialize)?;
        self.initializations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn reinitialize(&mut self, _fresh: bool) -> Result<()> {
        self.initialize()
    }

    fn run(&mut self, ctx: &Context, mut seq: TokenSeq) -> Result<TokenSeq> {
        ctx.check()?;
        self.fail(StageOp::Process)?;
        match self.kind {
            ProviderKind::Tokenizer => {
                let chunks = std::mem::take(&mut seq.raw);
                let total = chunks.len();
                for (i, chunk) in chunks.into_iter().enumerate() {
                    seq.tokens.push(Token::lexical(chunk));
                    ctx.report(i + 1, total);
                }
                ctx.report(total, total);
            }
            ProviderKind::Transliterator => {
                let total = seq.tokens.len();
                for (i, token) in seq.tokens.iter_mut().enumerate() {
                    token.romanization = token.surface.to_uppercase();
                    ctx.report(i + 1, total);
                }
                ctx.report(total, total);
            }
        }
        Ok(seq)
    }

    fn release(&mut self) -> Result<()> {
        self.fail(StageOp::Release)?;
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
