//! Error type shared by the layers, the network and the data loaders.

use thiserror::Error;

/// Failures raised by the library.
///
/// Shape and state variants are contract violations: the operation that hit
/// them is aborted and no parameter is touched afterwards.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0} was read before it was set")]
    UninitializedState(&'static str),

    #[error("a network needs at least one layer")]
    EmptyNetwork,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid IDX data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Returns `ShapeMismatch` unless `actual == expected`.
pub(crate) fn ensure_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::ShapeMismatch {
            context,
            expected,
            actual,
        })
    }
}
