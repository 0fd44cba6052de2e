use std::io::ErrorKind;

use lora_tagger::TransformError;
use thiserror::Error;

use crate::util::paths::PathError;

/// Anything a handler can fail with; always rendered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Request body exceeds {0} bytes.")]
    BodyTooLarge(usize),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::BodyTooLarge(_) => 413,
            ApiError::Path(e) => match e {
                PathError::OutsideFolder => 403,
                PathError::ImageMissing => 404,
                PathError::Io { .. } => 500,
                _ => 400,
            },
            ApiError::Transform(e) => match e {
                TransformError::Decode(_) => 400,
                TransformError::Precondition(_) => 422,
                TransformError::Read { source, .. } if source.kind() == ErrorKind::NotFound => 404,
                TransformError::Read { .. } | TransformError::Io { .. } | TransformError::Processing(_) => 500,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lora_tagger::PreconditionError;
    use std::path::PathBuf;

    #[test]
    fn precondition_is_unprocessable() {
        let err = ApiError::from(TransformError::from(PreconditionError::NotSquare { width: 3, height: 4 }));
        assert_eq!(err.status(), 422);
        assert!(err.to_string().starts_with("not square"));
    }

    #[test]
    fn exhausted_write_is_a_server_error() {
        let err = ApiError::from(TransformError::Io {
            path: PathBuf::from("/x.png"),
            attempts: 3,
            source: std::io::Error::new(ErrorKind::PermissionDenied, "locked"),
        });
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn vanished_file_is_not_found() {
        let err = ApiError::from(TransformError::Read {
            path: PathBuf::from("/x.png"),
            source: std::io::Error::new(ErrorKind::NotFound, "gone"),
        });
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn path_errors() {
        assert_eq!(ApiError::from(PathError::OutsideFolder).status(), 403);
        assert_eq!(ApiError::from(PathError::InvalidFolder).status(), 400);
        assert_eq!(ApiError::from(PathError::ImageMissing).status(), 404);
    }
}
