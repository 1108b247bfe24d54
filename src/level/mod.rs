//! Level loading: staging, separator repair and JSON parsing.
//!
//! - [`load_level`]: stage a `.adofai` file and parse it into a [`LevelRecord`]
//! - [`parse_level`]: repair and parse level text already in memory
//! - [`repair_level_text`]: the separator/whitespace fixes on their own

mod record;
mod repair;
mod stage;

use std::path::Path;

use tracing::info;

use crate::error::LoadError;

pub use record::*;
pub use repair::repair_level_text;
pub use stage::{DEFAULT_STAGING_DIR, stage_level_file};

/// Stage the level file under `staging_dir` and parse the staged copy.
pub fn load_level<P: AsRef<Path>>(path: P, staging_dir: &str) -> Result<LevelRecord, LoadError> {
    let path = path.as_ref();
    let staged = stage_level_file(path, staging_dir)?;
    let text = read_level_file(&staged)?;
    let level = parse_level(&text)?;

    info!(
        "Loaded level {} (bpm {}, pitch {}, {} actions)",
        path.display(),
        level.settings.bpm,
        level.settings.pitch,
        level.actions.len()
    );
    Ok(level)
}

/// Repair exporter artifacts and parse the result.
pub fn parse_level(text: &str) -> Result<LevelRecord, LoadError> {
    let repaired = repair_level_text(text);
    serde_json::from_str(&repaired).map_err(LoadError::Malformed)
}

/// Read a level file as UTF-8, dropping a leading byte order mark.
pub fn read_level_file<P: AsRef<Path>>(path: P) -> Result<String, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (content, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(LoadError::Decode {
            path: path.to_path_buf(),
        });
    }

    Ok(content.into_owned())
}
