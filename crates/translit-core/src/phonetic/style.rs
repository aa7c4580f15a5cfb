//! Pinyin output styles.
//!
//! Readings are stored in numeric tone-suffix form (`zhong1`, `lv4`); every
//! other style is rendered from it. `v` and `u:` are accepted for `ü`.

use std::fmt;

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// `zhong`
    Normal,
    /// `zhōng`
    #[default]
    Tone,
    /// `zho1ng`
    Tone2,
    /// `zhong1`
    Tone3,
    /// `zh`
    Initials,
    /// `z`
    FirstLetter,
    /// `ong`
    Finals,
    /// `ōng`
    FinalsTone,
    /// `o1ng`
    FinalsTone2,
    /// `ong1`
    FinalsTone3,
}

static STYLE_NAMES: &[(&str, Style)] = &[
    ("normal", Style::Normal),
    ("tone", Style::Tone),
    ("tone2", Style::Tone2),
    ("tone3", Style::Tone3),
    ("initials", Style::Initials),
    ("first_letter", Style::FirstLetter),
    ("finals", Style::Finals),
    ("finals_tone", Style::FinalsTone),
    ("finals_tone2", Style::FinalsTone2),
    ("finals_tone3", Style::FinalsTone3),
];

/// Initials, two-letter ones first so `zh` wins over `z`.
static INITIALS: &[&str] = &[
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s",
];

impl Style {
    pub const ALL: [Style; 10] = [
        Style::Normal,
        Style::Tone,
        Style::Tone2,
        Style::Tone3,
        Style::Initials,
        Style::FirstLetter,
        Style::Finals,
        Style::FinalsTone,
        Style::FinalsTone2,
        Style::FinalsTone3,
    ];

    pub fn name(self) -> &'static str {
        STYLE_NAMES
            .iter()
            .find(|&&(_, s)| s == self)
            .map(|&(n, _)| n)
            .unwrap_or("tone")
    }

    /// Case-insensitive lookup by name. Accepts `-` or space for `_`.
    pub fn parse(name: &str) -> Option<Style> {
        let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        STYLE_NAMES
            .iter()
            .find(|&&(n, _)| n == key)
            .map(|&(_, s)| s)
    }

    /// Like [`Style::parse`], falling back to diacritic tones for unknown names.
    pub fn parse_or_default(name: &str) -> Style {
        Self::parse(name).unwrap_or_else(|| {
            warn!(name, "unknown pinyin style, using tone marks");
            Style::default()
        })
    }

    /// Render one numeric syllable (`hao3`) in this style.
    pub fn render(self, syllable: &str) -> String {
        let (body, tone) = split_tone(syllable);
        match self {
            Style::Normal => body,
            Style::Tone => with_mark(&body, tone),
            Style::Tone2 => with_infix(&body, tone),
            Style::Tone3 => with_suffix(body, tone),
            Style::Initials => initial_of(&body).to_string(),
            Style::FirstLetter => body.chars().next().map(String::from).unwrap_or_default(),
            Style::Finals => finals_of(&body),
            Style::FinalsTone => with_mark(&finals_of(&body), tone),
            Style::FinalsTone2 => with_infix(&finals_of(&body), tone),
            Style::FinalsTone3 => with_suffix(finals_of(&body), tone),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split `hao3` into (`hao`, Some(3)). Normalizes `v`/`u:` to `ü`.
fn split_tone(syllable: &str) -> (String, Option<u8>) {
    let s = syllable.trim().to_lowercase();
    let (body, tone) = match s.chars().last().and_then(|c| c.to_digit(10)) {
        Some(d) if (1..=5).contains(&d) => (&s[..s.len() - 1], Some(d as u8)),
        Some(_) => (&s[..s.len() - 1], None),
        None => (s.as_str(), None),
    };
    (body.replace("u:", "ü").replace('v', "ü"), tone)
}

fn initial_of(body: &str) -> &str {
    INITIALS
        .iter()
        .find(|ini| body.len() > ini.len() && body.starts_with(*ini))
        .copied()
        .unwrap_or("")
}

fn finals_of(body: &str) -> String {
    let ini = initial_of(body);
    let rest = &body[ini.len()..];
    if ini.is_empty() {
        if let Some(r) = rest.strip_prefix("yu") {
            return format!("ü{r}");
        }
        if let Some(r) = rest.strip_prefix("yi") {
            return format!("i{r}");
        }
        if let Some(r) = rest.strip_prefix('y') {
            return format!("i{r}");
        }
        if let Some(r) = rest.strip_prefix("wu") {
            return format!("u{r}");
        }
        if let Some(r) = rest.strip_prefix('w') {
            return format!("u{r}");
        }
        return rest.to_string();
    }
    if matches!(ini, "j" | "q" | "x") {
        if let Some(r) = rest.strip_prefix('u') {
            return format!("ü{r}");
        }
    }
    rest.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'ü')
}

/// Char index of the vowel that carries the tone mark: `a` or `e` if present,
/// `o` of `ou`, otherwise the last vowel.
fn mark_position(chars: &[char]) -> Option<usize> {
    if let Some(i) = chars.iter().position(|&c| c == 'a' || c == 'e') {
        return Some(i);
    }
    if let Some(i) = chars.windows(2).position(|w| *w == ['o', 'u']) {
        return Some(i);
    }
    chars.iter().rposition(|&c| is_vowel(c))
}

fn marked(c: char, tone: u8) -> char {
    let row: [char; 4] = match c {
        'a' => ['ā', 'á', 'ǎ', 'à'],
        'e' => ['ē', 'é', 'ě', 'è'],
        'i' => ['ī', 'í', 'ǐ', 'ì'],
        'o' => ['ō', 'ó', 'ǒ', 'ò'],
        'u' => ['ū', 'ú', 'ǔ', 'ù'],
        'ü' => ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
        _ => return c,
    };
    match tone {
        1..=4 => row[tone as usize - 1],
        _ => c,
    }
}

fn with_mark(body: &str, tone: Option<u8>) -> String {
    let Some(tone @ 1..=4) = tone else {
        return body.to_string();
    };
    let mut chars: Vec<char> = body.chars().collect();
    if let Some(i) = mark_position(&chars) {
        chars[i] = marked(chars[i], tone);
    }
    chars.into_iter().collect()
}

fn with_infix(body: &str, tone: Option<u8>) -> String {
    let Some(tone @ 1..=4) = tone else {
        return body.to_string();
    };
    let chars: Vec<char> = body.chars().collect();
    match mark_position(&chars) {
        Some(i) => {
            let mut out: String = chars[..=i].iter().collect();
            out.push(char::from(b'0' + tone));
            out.extend(&chars[i + 1..]);
            out
        }
        None => format!("{body}{tone}"),
    }
}

fn with_suffix(mut body: String, tone: Option<u8>) -> String {
    if let Some(t) = tone {
        body.push(char::from(b'0' + t));
    }
    body
}
