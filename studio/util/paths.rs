use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions the studio treats as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Invalid path provided.")]
    InvalidFolder,

    #[error("Path does not exist: {}", .0.display())]
    FolderMissing(PathBuf),

    #[error("Path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid image name.")]
    InvalidImageName,

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Forbidden: Access outside designated folder.")]
    OutsideFolder,

    #[error("Image not found")]
    ImageMissing,

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves a user-supplied folder to a canonical, existing directory.
pub fn resolve_folder(folder: &str) -> Result<PathBuf, PathError> {
    let folder = folder.trim();
    if folder.is_empty() {
        return Err(PathError::InvalidFolder);
    }

    let canonical = std::fs::canonicalize(folder).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PathError::FolderMissing(PathBuf::from(folder)),
        _ => PathError::Io { path: PathBuf::from(folder), source },
    })?;

    if !canonical.is_dir() {
        return Err(PathError::NotADirectory(canonical));
    }
    Ok(canonical)
}

pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| ok.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Resolves `name` inside an already canonical `folder`.
///
/// The name must be a bare file name with an image extension, and the
/// resolved file (symlinks followed) must still live under `folder`.
pub fn resolve_image(folder: &Path, name: &str) -> Result<PathBuf, PathError> {
    if name.trim().is_empty() {
        return Err(PathError::InvalidImageName);
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") || name.contains('\0') {
        return Err(PathError::OutsideFolder);
    }
    if !is_image_name(name) {
        return Err(PathError::UnsupportedType(name.to_owned()));
    }

    let joined = folder.join(name);
    let canonical = std::fs::canonicalize(&joined).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PathError::ImageMissing,
        _ => PathError::Io { path: joined.clone(), source },
    })?;

    if !canonical.starts_with(folder) {
        return Err(PathError::OutsideFolder);
    }
    if !canonical.is_file() {
        return Err(PathError::ImageMissing);
    }
    Ok(canonical)
}

/// Resolves a `(folderPath, imageName)` pair in one step.
pub fn resolve_image_in(folder: &str, name: &str) -> Result<PathBuf, PathError> {
    let folder = resolve_folder(folder)?;
    resolve_image(&folder, name)
}

/// Content-Type for serving an image by its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            std::fs::write(dir.path().join(f), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn empty_folder_path_is_invalid() {
        assert!(matches!(resolve_folder("   "), Err(PathError::InvalidFolder)));
    }

    #[test]
    fn missing_folder_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve_folder(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PathError::FolderMissing(_)));
        assert!(err.to_string().starts_with("Path does not exist: "));
    }

    #[test]
    fn file_is_not_a_folder() {
        let dir = folder_with(&["a.png"]);
        let file = dir.path().join("a.png");
        assert!(matches!(resolve_folder(file.to_str().unwrap()), Err(PathError::NotADirectory(_))));
    }

    #[test]
    fn resolves_existing_image() {
        let dir = folder_with(&["01.PNG"]);
        let path = resolve_image_in(dir.path().to_str().unwrap(), "01.PNG").unwrap();
        assert!(path.ends_with("01.PNG"));
    }

    #[test]
    fn traversal_is_forbidden() {
        let dir = folder_with(&[]);
        let folder = resolve_folder(dir.path().to_str().unwrap()).unwrap();
        for name in ["../x.png", "sub/x.png", "..\\x.png", "..png"] {
            assert!(matches!(resolve_image(&folder, name), Err(PathError::OutsideFolder)), "{}", name);
        }
    }

    #[test]
    fn non_image_extension_is_rejected() {
        let dir = folder_with(&["tags.txt"]);
        let folder = resolve_folder(dir.path().to_str().unwrap()).unwrap();
        assert!(matches!(resolve_image(&folder, "tags.txt"), Err(PathError::UnsupportedType(_))));
    }

    #[test]
    fn missing_image_is_not_found() {
        let dir = folder_with(&[]);
        let folder = resolve_folder(dir.path().to_str().unwrap()).unwrap();
        assert!(matches!(resolve_image(&folder, "gone.jpg"), Err(PathError::ImageMissing)));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_is_forbidden() {
        let outside = folder_with(&["secret.png"]);
        let inside = folder_with(&[]);
        std::os::unix::fs::symlink(outside.path().join("secret.png"), inside.path().join("link.png")).unwrap();
        let folder = resolve_folder(inside.path().to_str().unwrap()).unwrap();
        assert!(matches!(resolve_image(&folder, "link.png"), Err(PathError::OutsideFolder)));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("a")), "application/octet-stream");
    }
}
