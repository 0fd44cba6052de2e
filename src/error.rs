use std::path::PathBuf;
use thiserror::Error;

/// A geometric precondition that a transform refused to run under.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("not square: image is {width}x{height}, pad it to a square first")]
    NotSquare { width: u32, height: u32 },

    #[error("already at or below target: image is {size}x{size}, target is {target}")]
    AtOrBelowTarget { size: u32, target: u32 },

    #[error("target size must be positive")]
    ZeroTarget,
}

/// Every way a single transform request can fail.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a decodable image: {0}")]
    Decode(#[source] image::ImageError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("failed to write {} after {attempts} attempt(s): {source}", .path.display())]
    Io {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("image processing failed: {0}")]
    Processing(String),
}

impl TransformError {
    /// `true` for failures caused by the input rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TransformError::Decode(_) | TransformError::Precondition(_))
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
