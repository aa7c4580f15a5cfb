use std::process;
use std::sync::Arc;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use translit_engine::lexicon::Lexicon;
use translit_engine::registry::{ProviderEntry, Scheme};
use translit_engine::Engine;

use super::run_ops::pad;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Listing the directory does not touch any oracle, so an empty lexicon is
/// enough to build it.
fn engine() -> Engine {
    die!(
        Engine::with_lexicon(Arc::new(Lexicon::default())),
        "Error building registry: {}"
    )
}

#[derive(Serialize)]
struct SchemeRow<'a> {
    #[serde(flatten)]
    scheme: &'a Scheme,
    default: bool,
}

pub fn format_schemes(schemes: &[Scheme], default: Option<&str>) -> String {
    let width = schemes
        .iter()
        .map(|s| UnicodeWidthStr::width(s.name.as_str()))
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for s in schemes {
        let marker = if Some(s.name.as_str()) == default { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {}  {:<13} {}\n",
            pad(&s.name, width),
            s.param,
            s.description
        ));
    }
    out
}

pub fn format_providers(entries: &[&ProviderEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for e in entries {
        out.push_str(&format!(
            "{}  {:<14} {}\n",
            pad(&e.name, width),
            e.kind.as_str(),
            e.capabilities.join(", ")
        ));
    }
    out
}

pub fn schemes(lang: &str, json: bool) {
    let engine = engine();
    let registry = engine.registry();
    let list = registry.schemes(lang);
    if list.is_empty() {
        eprintln!("No schemes registered for {lang:?}");
        process::exit(1);
    }
    let default = registry.default_scheme(lang).map(|s| s.name.as_str());

    if json {
        let rows: Vec<SchemeRow> = list
            .iter()
            .map(|scheme| SchemeRow {
                scheme,
                default: Some(scheme.name.as_str()) == default,
            })
            .collect();
        println!(
            "{}",
            die!(serde_json::to_string_pretty(&rows), "JSON error: {}")
        );
    } else {
        print!("{}", format_schemes(list, default));
    }
}

pub fn providers(lang: &str, json: bool) {
    let engine = engine();
    let entries: Vec<&ProviderEntry> = engine.registry().providers(lang).collect();
    if entries.is_empty() {
        eprintln!("No providers registered for {lang:?}");
        process::exit(1);
    }

    if json {
        println!(
            "{}",
            die!(serde_json::to_string_pretty(&entries), "JSON error: {}")
        );
    } else {
        print!("{}", format_providers(&entries));
    }
}
