//! Chinese: segmentation plus pinyin transliteration.

mod tokenizer;
mod transliterator;

#[cfg(test)]
mod tests;

pub use tokenizer::{SegmenterFactory, ZhTokenizer, TOKENIZER_NAME};
pub use transliterator::{ZhTransliterator, TRANSLITERATOR_NAME};

use std::sync::Arc;

use crate::phonetic::PhoneticOracle;
use crate::pipeline::{capability, ProviderKind};
use crate::registry::{ProviderEntry, RegistryBuilder, Scheme};
use crate::settings::settings;

pub const LANGUAGE: &str = "zh";

/// (name, description, style)
pub static SCHEMES: &[(&str, &str, &str)] = &[
    ("Pinyin", "Pinyin with tone marks (nǐ hǎo)", "tone"),
    ("Pinyin (plain)", "Pinyin without tones (ni hao)", "normal"),
    ("Pinyin (numbered)", "Pinyin with tone numbers (ni3 hao3)", "tone3"),
    ("Pinyin (tone after vowel)", "Tone number after the marked vowel (ni3 ha3o)", "tone2"),
    ("Pinyin initials", "Initial consonants only (n h)", "initials"),
    ("Pinyin first letters", "First letter of each syllable (n h)", "first_letter"),
    ("Pinyin finals", "Finals without tones (i ao)", "finals"),
    ("Pinyin finals (tone marks)", "Finals with tone marks (ǐ ǎo)", "finals_tone"),
    ("Pinyin finals (tone after vowel)", "Finals, tone number after the marked vowel (i3 a3o)", "finals_tone2"),
    ("Pinyin finals (numbered)", "Finals with tone numbers (i3 ao3)", "finals_tone3"),
];

/// Register the Chinese providers, their default chain and every scheme.
/// The default scheme is `zh.default_scheme` from settings.
pub fn register(
    builder: RegistryBuilder,
    segmenter: SegmenterFactory,
    oracle: Arc<dyn PhoneticOracle>,
) -> RegistryBuilder {
    let tokenizer = ProviderEntry::new(
        LANGUAGE,
        TOKENIZER_NAME,
        ProviderKind::Tokenizer,
        &[capability::TOKENIZATION, capability::POS_TAGGING],
        move || Box::new(ZhTokenizer::new(Arc::clone(&segmenter))),
    );
    let transliterator = ProviderEntry::new(
        LANGUAGE,
        TRANSLITERATOR_NAME,
        ProviderKind::Transliterator,
        &[
            capability::TRANSLITERATION,
            capability::HETERONYMS,
            capability::TONE,
        ],
        move || Box::new(ZhTransliterator::new(Arc::clone(&oracle))),
    );

    let mut builder = builder
        .provider(tokenizer)
        .provider(transliterator)
        .default_chain(
            LANGUAGE,
            &[
                (ProviderKind::Tokenizer, TOKENIZER_NAME),
                (ProviderKind::Transliterator, TRANSLITERATOR_NAME),
            ],
        );
    for &(name, description, style) in SCHEMES {
        builder = builder.scheme(
            LANGUAGE,
            Scheme::new(name, description, TRANSLITERATOR_NAME, style),
        );
    }
    builder.default_scheme(LANGUAGE, &settings().zh.default_scheme)
}
