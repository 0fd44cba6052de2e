use std::io::Cursor;
use tiny_http::Response;

use crate::error::ApiError;
use crate::routes::{bytes_response, error_response};
use crate::util::form::{form_get, parse_form};
use crate::util::paths::{content_type_for, resolve_image_in, PathError};

/// `GET /api/image?folderPath=..&imageName=..`
///
/// Serves the raw bytes of one image from the project folder.
pub fn handle_get(query: &str) -> Response<Cursor<Vec<u8>>> {
    match load(query) {
        Ok((content_type, bytes)) => bytes_response(content_type, bytes),
        Err(e) => error_response(&e),
    }
}

fn load(query: &str) -> Result<(&'static str, Vec<u8>), ApiError> {
    let pairs  = parse_form(query);
    let folder = form_get(&pairs, "folderPath").unwrap_or("");
    let name   = form_get(&pairs, "imageName").unwrap_or("");
    if folder.is_empty() || name.is_empty() {
        return Err(ApiError::BadRequest("folderPath and imageName are required".into()));
    }

    let path  = resolve_image_in(folder, name)?;
    let bytes = std::fs::read(&path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => PathError::ImageMissing,
        _ => PathError::Io { path: path.clone(), source },
    })?;
    Ok((content_type_for(&path), bytes))
}
