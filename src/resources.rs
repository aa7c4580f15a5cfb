use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::lexicon::{parse_lexicon_toml, Lexicon};
use crate::settings;

use super::EngineError;

fn read(path: &Path) -> Result<String, EngineError> {
    fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Read and validate a lexicon TOML file.
pub fn open_lexicon(path: &Path) -> Result<Arc<Lexicon>, EngineError> {
    let lexicon = parse_lexicon_toml(&read(path)?)?;
    debug!(
        path = %path.display(),
        words = lexicon.word_count(),
        readings = lexicon.reading_count(),
        "lexicon loaded"
    );
    Ok(Arc::new(lexicon))
}

/// Install a custom settings file. Must run before anything reads settings.
pub fn load_settings(path: &Path) -> Result<(), EngineError> {
    settings::init_custom(read(path)?)?;
    Ok(())
}
