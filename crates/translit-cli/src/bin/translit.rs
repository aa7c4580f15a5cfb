use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use translit_cli::commands::{config_ops, registry_ops, run_ops};

#[derive(Parser)]
#[command(name = "translit", about = "Chinese segmentation and pinyin transliteration")]
struct Cli {
    /// Write JSONL traces to this directory (needs the `trace` feature)
    #[arg(long, global = true)]
    trace_dir: Option<PathBuf>,
    /// Custom settings TOML, applied before anything runs
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment and transliterate text
    Run {
        /// Text to process
        text: String,
        /// Path to the lexicon TOML file
        #[arg(long)]
        lexicon: String,
        /// Scheme name (case-insensitive; unknown names use the default)
        #[arg(long)]
        scheme: Option<String>,
        /// Pipeline mode: combined or tokenize
        #[arg(long, default_value = "combined")]
        mode: String,
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List registered schemes
    Schemes {
        #[arg(long, default_value = "zh")]
        lang: String,
        #[arg(long)]
        json: bool,
    },
    /// List registered providers and their capabilities
    Providers {
        #[arg(long, default_value = "zh")]
        lang: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the embedded default settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        /// Path to the settings TOML file
        file: String,
    },
    /// Validate a lexicon TOML file
    LexiconValidate {
        /// Path to the lexicon TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let _trace = cli
        .trace_dir
        .as_deref()
        .map(translit_engine::trace_init::init_tracing);

    if let Some(path) = &cli.settings {
        if let Err(e) = translit_engine::load_settings(Path::new(path)) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    match cli.command {
        Command::Run {
            text,
            lexicon,
            scheme,
            mode,
            json,
        } => run_ops::run(
            &text,
            &run_ops::RunOptions {
                lexicon: &lexicon,
                scheme: scheme.as_deref(),
                mode: &mode,
                json,
            },
        ),
        Command::Schemes { lang, json } => registry_ops::schemes(&lang, json),
        Command::Providers { lang, json } => registry_ops::providers(&lang, json),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::LexiconValidate { file } => config_ops::lexicon_validate(&file),
    }
}
