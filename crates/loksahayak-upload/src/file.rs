use std::path::Path;

use loksahayak_core::types::SelectedFile;

use crate::error::UploadError;

/// Read a local file into memory, guessing its media type from the extension.
pub async fn load_file(path: &Path) -> Result<SelectedFile, UploadError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    tracing::debug!(file = %name, media_type = %media_type, bytes = bytes.len(), "File loaded");
    Ok(SelectedFile::new(name, media_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_png_guesses_image_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let file = load_file(&path).await.unwrap();
        assert_eq!(file.name, "receipt.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.len(), 4);
        assert!(file.is_image());
    }

    #[tokio::test]
    async fn test_load_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.unknownext");
        std::fs::write(&path, b"hello").unwrap();

        let file = load_file(&path).await.unwrap();
        assert_eq!(file.media_type, "application/octet-stream");
        assert!(!file.is_image());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let result = load_file(Path::new("/nonexistent/photo.jpg")).await;
        assert!(matches!(result, Err(UploadError::Io(_))));
    }
}
