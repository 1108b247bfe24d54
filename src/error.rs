use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a level file on disk into a [`LevelRecord`](crate::level::LevelRecord).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Level file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Level file is not valid UTF-8: {path}")]
    Decode { path: PathBuf },

    #[error("Malformed level data after repair")]
    Malformed(#[source] serde_json::Error),
}

/// Structural problems in a parsed level.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Unknown path symbol {symbol:?} at index {index}")]
    UnknownSymbol { symbol: char, index: usize },

    #[error("Level has neither angleData nor pathData")]
    MissingPath,

    #[error("Action on floor {floor} is outside the level ({tiles} tiles)")]
    FloorOutOfRange { floor: usize, tiles: usize },
}

/// Settings that make the timing math or hand split undefined.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("BPM must be positive, got {bpm} at floor {floor}")]
    InvalidBpm { floor: usize, bpm: f64 },

    #[error("Pitch must be positive, got {0}")]
    InvalidPitch(f64),

    #[error("At least two keys are required, got {0}")]
    TooFewKeys(usize),

    #[error("Dwell budget must be positive, got {0}")]
    InvalidDwellBudget(f64),

    #[error("Taps per second must be positive, got {0}")]
    InvalidTapRate(f64),
}

/// Either failure the rhythm compiler can report.
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure reported by a key injection backend.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("Unknown key identifier: {0}")]
    UnknownKey(String),

    #[error("Key injection backend failed: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_wraps_parse_error() {
        let err: CompileError = ParseError::MissingPath.into();
        assert_eq!(err, CompileError::Parse(ParseError::MissingPath));
        assert_eq!(err.to_string(), "Level has neither angleData nor pathData");
    }

    #[test]
    fn test_unknown_symbol_message() {
        let err = ParseError::UnknownSymbol {
            symbol: 'x',
            index: 3,
        };
        assert_eq!(err.to_string(), "Unknown path symbol 'x' at index 3");
    }
}
