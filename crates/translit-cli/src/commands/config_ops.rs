use std::fs;
use std::process;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", translit_engine::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        translit_engine::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: pipeline.cancel_check_interval={}, pipeline.default_max_input_length={}, zh.default_scheme={:?}",
        s.pipeline.cancel_check_interval, s.pipeline.default_max_input_length, s.zh.default_scheme
    );
}

pub fn lexicon_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let lex = die!(
        translit_engine::lexicon::parse_lexicon_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: {} words, {} characters with readings",
        lex.word_count(),
        lex.reading_count()
    );
}
