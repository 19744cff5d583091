//! Load-time failures
//!
//! Everything here is fatal and surfaces before the first frame runs.
//! The simulation loop itself never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level has no player spawn")]
    MissingPlayer,
    #[error("level has {0} player spawns, expected exactly one")]
    DuplicatePlayer(usize),
    #[error("platform spawn #{index} has no destination")]
    MissingDestination { index: usize },
}

impl LoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
