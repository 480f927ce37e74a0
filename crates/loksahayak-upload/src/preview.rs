//! Revocable preview resources for selected files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use loksahayak_core::types::SelectedFile;

use crate::error::UploadError;

/// Opaque reference to a displayable preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates and revokes preview resources.
pub trait PreviewProvider: Send + Sync {
    fn create(&self, file: &SelectedFile) -> Result<PreviewHandle, UploadError>;
    fn revoke(&self, handle: &PreviewHandle);
}

/// A live preview. Revoked when dropped.
pub struct Preview {
    handle: PreviewHandle,
    provider: Arc<dyn PreviewProvider>,
}

impl Preview {
    pub fn create(
        provider: Arc<dyn PreviewProvider>,
        file: &SelectedFile,
    ) -> Result<Self, UploadError> {
        let handle = provider.create(file)?;
        tracing::debug!(preview = %handle, file = %file.name, "Preview created");
        Ok(Self { handle, provider })
    }

    pub fn handle(&self) -> &PreviewHandle {
        &self.handle
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Preview").field(&self.handle).finish()
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        tracing::debug!(preview = %self.handle, "Preview revoked");
        self.provider.revoke(&self.handle);
    }
}

/// Materializes previews as files in a directory; revoking deletes the file.
#[derive(Debug, Clone)]
pub struct DiskPreviewProvider {
    dir: PathBuf,
}

impl DiskPreviewProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn extension_for(file: &SelectedFile) -> String {
        Path::new(&file.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .or_else(|| {
                mime_guess::get_mime_extensions_str(&file.media_type)
                    .and_then(|exts| exts.first())
                    .map(|e| e.to_string())
            })
            .unwrap_or_else(|| "bin".to_string())
    }
}

impl PreviewProvider for DiskPreviewProvider {
    fn create(&self, file: &SelectedFile) -> Result<PreviewHandle, UploadError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(format!("{}.{}", Uuid::new_v4(), Self::extension_for(file)));
        std::fs::write(&path, &file.bytes)?;
        Ok(PreviewHandle::new(path.to_string_lossy().into_owned()))
    }

    fn revoke(&self, handle: &PreviewHandle) {
        let path = Path::new(handle.as_str());
        if !path.starts_with(&self.dir) {
            tracing::warn!(preview = %handle, "Refusing to revoke preview outside preview dir");
            return;
        }
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(preview = %handle, error = %e, "Failed to remove preview file");
        }
    }
}
