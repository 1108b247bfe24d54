use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LoadError;

/// Default name of the staging folder created next to the level file.
pub const DEFAULT_STAGING_DIR: &str = "adofai_auto";

/// Copy `source` into `<parent>/<staging_dir>/<stem>.txt` and return that path.
///
/// An existing staged copy is replaced. The staged file is left on disk.
pub fn stage_level_file(source: &Path, staging_dir: &str) -> Result<PathBuf, LoadError> {
    if !source.is_file() {
        return Err(LoadError::NotFound {
            path: source.to_path_buf(),
        });
    }

    let file_name = source.file_name().ok_or_else(|| LoadError::NotFound {
        path: source.to_path_buf(),
    })?;
    let stem = source.file_stem().unwrap_or(file_name);
    let parent = source.parent().unwrap_or_else(|| Path::new("."));

    let dir = parent.join(staging_dir);
    fs::create_dir_all(&dir).map_err(io_error(&dir))?;

    let copied = dir.join(file_name);
    let mut staged_name = stem.to_os_string();
    staged_name.push(".txt");
    let staged = dir.join(staged_name);

    fs::copy(source, &copied).map_err(io_error(&copied))?;
    if copied != staged {
        remove_if_exists(&staged)?;
        fs::rename(&copied, &staged).map_err(io_error(&staged))?;
    }

    debug!("Staged {} as {}", source.display(), staged.display());
    Ok(staged)
}

fn remove_if_exists(path: &Path) -> Result<(), LoadError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stage_creates_txt_copy() {
        let dir = tempdir().unwrap();
        let level = dir.path().join("song.adofai");
        fs::write(&level, "{}").unwrap();

        let staged = stage_level_file(&level, DEFAULT_STAGING_DIR).unwrap();

        assert_eq!(staged, dir.path().join("adofai_auto").join("song.txt"));
        assert_eq!(fs::read_to_string(&staged).unwrap(), "{}");
        assert!(level.exists(), "source must be left in place");
        assert!(!dir.path().join("adofai_auto").join("song.adofai").exists());
    }

    #[test]
    fn test_stage_replaces_previous_copy() {
        let dir = tempdir().unwrap();
        let level = dir.path().join("song.adofai");
        fs::write(&level, "new").unwrap();
        fs::create_dir_all(dir.path().join("adofai_auto")).unwrap();
        fs::write(dir.path().join("adofai_auto").join("song.txt"), "old").unwrap();

        let staged = stage_level_file(&level, DEFAULT_STAGING_DIR).unwrap();

        assert_eq!(fs::read_to_string(staged).unwrap(), "new");
    }

    #[test]
    fn test_stage_keeps_dotted_stem() {
        let dir = tempdir().unwrap();
        let level = dir.path().join("my.song.adofai");
        fs::write(&level, "{}").unwrap();

        let staged = stage_level_file(&level, DEFAULT_STAGING_DIR).unwrap();

        assert_eq!(staged.file_name().unwrap(), "my.song.txt");
    }

    #[test]
    fn test_stage_missing_source() {
        let dir = tempdir().unwrap();
        let result = stage_level_file(&dir.path().join("missing.adofai"), DEFAULT_STAGING_DIR);

        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }
}
