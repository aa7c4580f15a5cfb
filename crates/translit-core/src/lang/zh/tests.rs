use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::error::{CancelReason, Error};
use crate::lexicon::LexiconPhonetic;
use crate::pipeline::{CancelToken, Context, Mode, Pipeline};
use crate::registry::Registry;
use crate::segment::Segmenter;
use crate::testutil::{sample_phonetic, CountingOracle, ProbedSegmenter, SegmenterProbe};
use crate::token::TokenSeq;

struct Fixture {
    registry: Registry,
    probe: SegmenterProbe,
    oracle: Arc<CountingOracle<LexiconPhonetic>>,
}

fn fixture() -> Fixture {
    let probe = SegmenterProbe::default();
    let p = probe.clone();
    let oracle = Arc::new(CountingOracle::new(sample_phonetic()));
    let factory: SegmenterFactory =
        Arc::new(move || Box::new(ProbedSegmenter::new(p.clone())) as Box<dyn Segmenter>);
    let registry = register(Registry::builder(), factory, oracle.clone())
        .build()
        .unwrap();
    Fixture {
        registry,
        probe,
        oracle,
    }
}

fn chunks(texts: &[&str]) -> TokenSeq {
    TokenSeq::from_chunks(texts.iter().map(|t| t.to_string()).collect())
}

fn recorder() -> (Context, Arc<Mutex<Vec<(usize, usize)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let ctx = Context::new().with_progress(move |p, t| sink.lock().unwrap().push((p, t)));
    (ctx, seen)
}

fn find<'a>(seq: &'a TokenSeq, surface: &str) -> &'a crate::token::Token {
    seq.tokens
        .iter()
        .find(|t| t.surface == surface)
        .unwrap_or_else(|| panic!("no token {surface:?}"))
}

#[test]
fn test_chinese_sentence_default_scheme() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let out = p
        .process(&Context::new(), Mode::Combined, chunks(&["你好吗，世界？"]))
        .unwrap();

    assert_eq!(out.surface(), "你好吗，世界？");
    assert!(!find(&out, "，").is_lexical);
    assert!(!find(&out, "？").is_lexical);
    assert_eq!(find(&out, "你好").romanization, "nǐ hǎo");
    assert_eq!(find(&out, "世界").romanization, "shì jiè");
    assert_eq!(find(&out, "吗").romanization, "ma");
    assert_eq!(find(&out, "吗").zh().unwrap().tone, Some(5));
    assert!(find(&out, "，").zh().is_none());
}

#[test]
fn test_chinese_sentence_numbered_scheme() {
    let f = fixture();
    let mut p = f
        .registry
        .pipeline_for_scheme(LANGUAGE, "pinyin (NUMBERED)")
        .unwrap();
    let out = p
        .process(&Context::new(), Mode::Combined, chunks(&["你好吗，世界？"]))
        .unwrap();
    assert_eq!(find(&out, "你好").romanization, "ni3 hao3");
    assert_eq!(out.romanized(" "), "ni3 hao3 ma5 shi4 jie4");
}

#[test]
fn test_latin_text_is_identity_without_oracle() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let out = p
        .process(&Context::new(), Mode::Combined, chunks(&["Hello 123"]))
        .unwrap();

    assert_eq!(out.surface(), "Hello 123");
    for t in &out.tokens {
        assert_eq!(t.romanization, t.surface);
    }
    assert_eq!(f.oracle.calls(), 0);
}

#[test]
fn test_schemes_registered() {
    let f = fixture();
    let schemes = f.registry.schemes(LANGUAGE);
    assert_eq!(schemes.len(), SCHEMES.len());
    assert!(schemes.iter().all(|s| s.provider == TRANSLITERATOR_NAME));
    assert_eq!(f.registry.default_scheme(LANGUAGE).unwrap().name, "Pinyin");
    assert_eq!(
        f.registry.resolve_scheme(LANGUAGE, "Wade-Giles").unwrap().name,
        "Pinyin"
    );
    for &(_, _, style) in SCHEMES {
        assert!(crate::phonetic::Style::parse(style).is_some(), "{style}");
    }
}

#[test]
fn test_unknown_scheme_uses_default_style() {
    let f = fixture();
    let mut p = f.registry.pipeline_for_scheme(LANGUAGE, "no such scheme").unwrap();
    let out = p
        .process(&Context::new(), Mode::Combined, chunks(&["你好"]))
        .unwrap();
    assert_eq!(out.romanized(" "), "nǐ hǎo");
}

#[test]
fn test_modes() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    assert_eq!(p.supported_modes().len(), 3);

    let tokens = p
        .process(&Context::new(), Mode::Tokenize, chunks(&["你好，世界"]))
        .unwrap();
    assert!(tokens.tokens.iter().all(|t| t.romanization.is_empty()));
    assert_eq!(f.oracle.calls(), 0);

    let out = p
        .process(&Context::new(), Mode::Transliterate, tokens)
        .unwrap();
    assert_eq!(out.romanized("|"), "nǐ hǎo|shì jiè");
    assert_eq!(f.oracle.calls(), 4);
}

#[test]
fn test_progress_is_monotonic_across_stages() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let (ctx, seen) = recorder();
    let out = p
        .process(&ctx, Mode::Combined, chunks(&["你好吗，", "世界？"]))
        .unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|&(p, t)| p <= t));
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    let &(last_p, last_t) = seen.last().unwrap();
    assert_eq!(last_p, last_t);
    // two chunks, then one report per token
    assert_eq!(last_t, 2 + out.len());
}

#[test]
fn test_cancel_before_process_touches_no_oracle() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let token = CancelToken::new();
    token.cancel();
    let ctx = Context::new().with_cancel(token);

    let err = p
        .process(&ctx, Mode::Combined, chunks(&["你好"]))
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled(CancelReason::Requested)));
    assert_eq!(f.probe.loads(), 0);
    assert_eq!(f.probe.segments(), 0);
    assert_eq!(f.oracle.calls(), 0);
}

#[test]
fn test_cancel_during_run_discards_output() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let token = CancelToken::new();
    let trigger = token.clone();
    let ctx = Context::new()
        .with_cancel(token)
        .with_progress(move |_, _| trigger.cancel());

    let err = p
        .process(&ctx, Mode::Combined, chunks(&["你好", "世界"]))
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(f.oracle.calls(), 0);
}

#[test]
fn test_cancel_mid_stage_stops_within_check_interval() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let text = "你好，".repeat(150);
    let tokens = p
        .process(&Context::new(), Mode::Tokenize, chunks(&[text.as_str()]))
        .unwrap();
    assert_eq!(tokens.len(), 300);

    let token = CancelToken::new();
    let trigger = token.clone();
    let ctx = Context::new()
        .with_cancel(token)
        .with_progress(move |processed, _| {
            if processed == 5 {
                trigger.cancel();
            }
        });
    let err = p.process(&ctx, Mode::Transliterate, tokens).unwrap_err();
    assert!(err.is_cancelled());

    let interval = crate::settings::settings().pipeline.cancel_check_interval;
    assert!(f.oracle.calls() > 0);
    assert!(f.oracle.calls() <= 2 * interval, "{} oracle calls", f.oracle.calls());
}

#[test]
fn test_deadline_reported_as_cancellation() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let token = CancelToken::new().with_deadline(Instant::now() - Duration::from_millis(1));
    let err = p
        .process(&Context::new().with_cancel(token), Mode::Combined, chunks(&["你好"]))
        .unwrap_err();
    assert!(matches!(
        err.root(),
        Error::Cancelled(CancelReason::DeadlineExceeded)
    ));
}

#[test]
fn test_lazy_initialization_and_single_release() {
    let f = fixture();
    let mut p: Pipeline = f.registry.default_pipeline(LANGUAGE).unwrap();
    assert_eq!(f.probe.loads(), 0);

    let ctx = Context::new();
    p.process(&ctx, Mode::Combined, chunks(&["你好"])).unwrap();
    p.process(&ctx, Mode::Combined, chunks(&["世界"])).unwrap();
    assert_eq!(f.probe.loads(), 1);

    p.close(&ctx).unwrap();
    p.close(&ctx).unwrap();
    drop(p);
    assert_eq!(f.probe.unloads(), 1);
}

#[test]
fn test_reinitialize_fresh_reloads_engine() {
    let f = fixture();
    let mut p = f.registry.default_pipeline(LANGUAGE).unwrap();
    let ctx = Context::new();
    p.initialize(&ctx).unwrap();
    p.reinitialize(&ctx, true).unwrap();
    assert_eq!(f.probe.loads(), 2);
    assert_eq!(f.probe.unloads(), 1);
}
