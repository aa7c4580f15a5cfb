use tracing::debug;

use crate::error::{Error, Result};
use crate::token::{Token, TokenExt, ZhReading};
use crate::unicode::is_han_text;

use super::{PhoneticOracle, Style};

/// Resolve the reading of a single token in place.
///
/// Filler, non-Han and non-`zh` tokens get an identity romanization and no
/// oracle call. Han tokens get a [`ZhReading`] and their `romanization` set
/// to its primary reading.
pub fn resolve_token(oracle: &dyn PhoneticOracle, style: Style, token: &mut Token) -> Result<()> {
    if !token.is_lexical || !is_han_text(&token.surface) {
        token.romanize_identity();
        return Ok(());
    }
    if let Some(e) = token.zh_mut().err() {
        debug!(surface = token.surface.as_str(), "{e}, identity fallback");
        token.romanize_identity();
        return Ok(());
    }

    let reading = resolve_surface(oracle, style, &token.surface)?;
    token.romanization.clone_from(&reading.primary_reading);
    token.ext = TokenExt::Zh(reading);
    Ok(())
}

/// Query the oracle for all candidates of `surface` in `style` and in numeric
/// form, and pick index 0 of every character's list.
///
/// Picking the first candidate is a frequency heuristic with no contextual
/// disambiguation. Tone is only derived for single-syllable surfaces; tone
/// sandhi across syllables is not attempted.
pub fn resolve_surface(oracle: &dyn PhoneticOracle, style: Style, surface: &str) -> Result<ZhReading> {
    let char_count = surface.chars().count();
    let display = oracle.readings(surface, style, true)?;
    let numeric = oracle.readings(surface, Style::Tone3, true)?;

    if display.len() != numeric.len() {
        return Err(Error::Consistency(format!(
            "{:?}: {} {} readings vs {} numeric readings",
            surface,
            display.len(),
            style,
            numeric.len()
        )));
    }
    if display.len() != char_count {
        return Err(Error::Consistency(format!(
            "{:?}: {} reading lists for {} characters",
            surface,
            display.len(),
            char_count
        )));
    }

    let primary_reading = join_first(&display);
    let primary_numeric = join_first(&numeric);
    let tone = if char_count == 1 {
        extract_tone(&primary_numeric)
    } else {
        None
    };

    Ok(ZhReading {
        primary_reading,
        primary_numeric,
        all_readings_by_character: display,
        numeric_reading_all: numeric,
        tone,
        original_tone: tone,
        tone_sandhi_applied: false,
    })
}

/// First candidate of every list, space-joined. Empty lists leave an empty
/// slot so positions stay aligned with characters.
fn join_first(lists: &[Vec<String>]) -> String {
    lists
        .iter()
        .map(|c| c.first().map(String::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trailing tone digit (1–5) of a single numeric syllable.
pub fn extract_tone(numeric: &str) -> Option<u8> {
    if numeric.is_empty() || numeric.contains(char::is_whitespace) {
        return None;
    }
    numeric
        .chars()
        .last()?
        .to_digit(10)
        .filter(|d| (1..=5).contains(d))
        .map(|d| d as u8)
}
