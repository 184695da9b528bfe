use std::io;
use thiserror::Error;

/// Crate-wide error type.
///
/// Construction-time problems are always surfaced synchronously; nothing is
/// clamped or papered over. A failure inside the render loop is fatal to that
/// frame and propagates to the loop owner.
#[derive(Debug, Error)]
pub enum LfError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {path}: {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("scene parse error: {0}")]
    SceneParse(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl LfError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        LfError::InvalidParameter(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        LfError::InvalidState(msg.into())
    }
}
