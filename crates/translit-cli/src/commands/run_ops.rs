use std::path::Path;
use std::process;

use unicode_width::UnicodeWidthStr;

use translit_engine::lang::zh;
use translit_engine::pipeline::{Context, Mode};
use translit_engine::{Engine, TokenSeq};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub struct RunOptions<'a> {
    pub lexicon: &'a str,
    pub scheme: Option<&'a str>,
    pub mode: &'a str,
    pub json: bool,
}

/// Right-pad `s` with spaces to `width` display columns.
pub fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w < width {
        format!("{s}{}", " ".repeat(width - w))
    } else {
        s.to_string()
    }
}

/// One row per token: surface, kind, romanization, tag, tone and the
/// per-character candidates.
pub fn format_table(seq: &TokenSeq) -> String {
    let surface_w = seq
        .tokens
        .iter()
        .map(|t| UnicodeWidthStr::width(t.surface.as_str()))
        .max()
        .unwrap_or(0)
        .max("surface".len());
    let roman_w = seq
        .tokens
        .iter()
        .map(|t| UnicodeWidthStr::width(t.romanization.as_str()))
        .max()
        .unwrap_or(0)
        .max("romanization".len());

    let mut out = format!(
        "{}  {:<4} {}  {:<4} {:<4} candidates\n",
        pad("surface", surface_w),
        "lex",
        pad("romanization", roman_w),
        "pos",
        "tone"
    );
    for t in &seq.tokens {
        let (tone, candidates) = match t.zh() {
            Some(r) => (
                r.tone.map(|n| n.to_string()).unwrap_or_default(),
                r.all_readings_by_character
                    .iter()
                    .map(|c| c.join("/"))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            None => (String::new(), String::new()),
        };
        let line = format!(
            "{}  {:<4} {}  {:<4} {:<4} {}",
            pad(&t.surface, surface_w),
            if t.is_lexical { "yes" } else { "-" },
            pad(&t.romanization, roman_w),
            t.pos.as_deref().unwrap_or(""),
            tone,
            candidates
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn run(text: &str, opts: &RunOptions) {
    let mode = Mode::parse(opts.mode).unwrap_or_else(|| {
        eprintln!("Unknown mode {:?} (expected tokenize or combined)", opts.mode);
        process::exit(1);
    });
    if mode == Mode::Transliterate {
        eprintln!("transliterate mode needs tokenized input; use combined");
        process::exit(1);
    }

    let engine = die!(Engine::open(Path::new(opts.lexicon)), "Error: {}");
    let seq = die!(
        engine.transliterate(&Context::new(), zh::LANGUAGE, opts.scheme, mode, text),
        "Error: {}"
    );

    if opts.json {
        println!(
            "{}",
            die!(serde_json::to_string_pretty(&seq), "JSON error: {}")
        );
    } else {
        print!("{}", format_table(&seq));
        if mode == Mode::Combined {
            println!("\n{}", seq.romanized(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translit_engine::{Token, TokenExt, ZhReading};

    #[test]
    fn pad_uses_display_width() {
        assert_eq!(pad("你好", 6), "你好  ");
        assert_eq!(pad("ab", 6), "ab    ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn table_aligns_wide_surfaces() {
        let mut a = Token::lexical("你好").with_pos("l").with_ext(TokenExt::Zh(ZhReading {
            all_readings_by_character: vec![vec!["nǐ".into()], vec!["hǎo".into(), "hào".into()]],
            ..Default::default()
        }));
        a.romanization = "nǐ hǎo".into();
        let mut b = Token::filler("，");
        b.romanize_identity();
        let mut c = Token::lexical("Hi");
        c.romanize_identity();
        let text = format_table(&TokenSeq::from_tokens(vec![a, b, c]));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].ends_with("nǐ hǎo/hào"), "{}", lines[1]);
        // romanization column starts at the same display offset on every row
        let width_before = |line: &str, idx: usize| UnicodeWidthStr::width(&line[..idx]);
        let zh_col = width_before(lines[1], lines[1].find("nǐ").unwrap());
        let latin_col = width_before(lines[3], lines[3].rfind("Hi").unwrap());
        assert_eq!(zh_col, latin_col);
    }
}
