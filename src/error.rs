//! Error types for the tictactoe-td crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move at position {position}: {reason}")]
    InvalidMove { position: usize, reason: String },

    #[error("game already over")]
    GameOver,

    #[error("no available positions to choose from")]
    EmptyActionSet,

    #[error("malformed signature '{key}': {reason}")]
    MalformedSignature { key: String, reason: String },

    #[error("board size {size} is not supported (must be 1-{max})", max = crate::tictactoe::MAX_BOARD_SIZE)]
    InvalidBoardSize { size: usize },

    #[error("board size mismatch: expected {expected}, found {found}")]
    BoardSizeMismatch { expected: usize, found: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported policy format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("move source closed before supplying a move")]
    InputClosed,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn occupied(position: usize) -> Self {
        Error::InvalidMove {
            position,
            reason: "cell is already occupied".to_string(),
        }
    }

    pub(crate) fn out_of_bounds(position: usize, cells: usize) -> Self {
        Error::InvalidMove {
            position,
            reason: format!("position is out of bounds (must be 0-{})", cells - 1),
        }
    }
}
