use std::{io, path::PathBuf};

use crate::{
    compression::DecodeError,
    pool::PoolError,
    resources::{AssetKind, IndexError},
    utils::mem_reader::InvalidDataError,
};

/// Conditions the game cannot recover from. The cache reports them instead of
/// exiting, and the caller decides how to shut down.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("Cache level raised past {max}")]
    LevelOverflow { max: usize },
    #[error("Cache level lowered below 0")]
    LevelUnderflow,
    #[error("Map {map} has no header")]
    NoSuchMap { map: usize },
    #[error("Can't open audio file {}", .path.display())]
    MissingAudioFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error during operation: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed data: {0}")]
    MalformedData(#[from] InvalidDataError),
    #[error("Malformed index: {0}")]
    Index(#[from] IndexError),
    #[error("Failed to decode chunk: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("Fatal: {0}")]
    Fatal(#[from] FatalError),
    #[error("{kind} chunk {id} is out of range (have {count})")]
    ChunkOutOfRange {
        kind: AssetKind,
        id: usize,
        count: usize,
    },
    #[error("No map is cached")]
    NoActiveMap,
    #[error("Tile ({x}, {y}) on plane {plane} is outside the current map")]
    TileOutOfRange { x: usize, y: usize, plane: usize },
}

impl CacheError {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, CacheError::Fatal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fatal_errors_are_fatal() {
        assert!(CacheError::from(FatalError::LevelUnderflow).is_fatal());
        assert!(!CacheError::NoActiveMap.is_fatal());
        assert!(!CacheError::from(io::Error::from(io::ErrorKind::NotFound)).is_fatal());
    }

    #[test]
    fn messages_name_the_failing_item() {
        let err = CacheError::ChunkOutOfRange {
            kind: AssetKind::Audio,
            id: 300,
            count: 120,
        };
        assert_eq!(err.to_string(), "audio chunk 300 is out of range (have 120)");
        let err = CacheError::from(FatalError::NoSuchMap { map: 7 });
        assert_eq!(err.to_string(), "Fatal: Map 7 has no header");
    }
}
