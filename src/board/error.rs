//! # Board Errors
//!
//! Failure taxonomy shared by the store adapter, the composer and the
//! mutation queue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    /// Transport failure or a non-success status from the document store
    #[error("Network failure: {0}")]
    Network(String),

    /// The store answered with a payload we could not interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// User input rejected before any network call
    #[error("Validation failure: {0}")]
    Validation(String),

    /// The mutation worker is gone and can no longer accept writes
    #[error("Mutation queue closed")]
    QueueClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BoardError::MalformedResponse(err.to_string())
        } else {
            BoardError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::MalformedResponse(err.to_string())
    }
}

impl BoardError {
    /// Whether the failure happened before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, BoardError::Validation(_))
    }
}

/// Result type alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_should_map_to_malformed_response() {
        let err = serde_json::from_str::<u64>("\"nope\"").unwrap_err();
        let board_err: BoardError = err.into();
        assert!(matches!(board_err, BoardError::MalformedResponse(_)));
    }

    #[test]
    fn validation_errors_should_be_flagged() {
        assert!(BoardError::Validation("empty".to_string()).is_validation());
        assert!(!BoardError::QueueClosed.is_validation());
    }
}
