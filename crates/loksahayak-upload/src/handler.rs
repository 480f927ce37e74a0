//! File selection and upload orchestration.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use loksahayak_core::i18n::TextKey;
use loksahayak_core::notice::{Notice, Notifier};
use loksahayak_core::transport::UploadTransport;
use loksahayak_core::types::SelectedFile;

use crate::error::UploadError;
use crate::preview::{Preview, PreviewHandle, PreviewProvider};

#[derive(Debug, Default)]
struct UploadState {
    selected: Option<SelectedFile>,
    preview: Option<Preview>,
    uploading: bool,
}

/// Owns the current selection and its preview, and fires uploads.
///
/// Dropping the handler revokes any live preview.
pub struct UploadHandler {
    transport: Arc<dyn UploadTransport>,
    previews: Arc<dyn PreviewProvider>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<UploadState>,
}

impl UploadHandler {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        previews: Arc<dyn PreviewProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            previews,
            notifier,
            state: Mutex::new(UploadState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UploadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Select a file, replace the preview and upload it.
    ///
    /// Non-image files raise an inline notice and change nothing else. While
    /// another upload is in flight the selection is refused with `Busy`.
    pub async fn select_file(&self, file: SelectedFile) -> Result<(), UploadError> {
        if !file.is_image() {
            tracing::info!(file = %file.name, media_type = %file.media_type, "Rejected non-image file");
            self.notifier.notify(Notice::inline(TextKey::ImageOnly));
            return Err(UploadError::NotAnImage(file.media_type));
        }

        let (uploading, previous) = {
            let mut state = self.lock();
            let uploading = UploadingGuard::claim(&self.state, &mut state)?;
            (uploading, state.preview.take())
        };

        // Revoke the old preview before the new one exists.
        let previews = Arc::clone(&self.previews);
        let source = file.clone();
        let preview = match tokio::task::spawn_blocking(move || {
            drop(previous);
            Preview::create(previews, &source)
        })
        .await
        {
            Ok(Ok(preview)) => Some(preview),
            Ok(Err(e)) => {
                tracing::warn!(file = %file.name, error = %e, "Preview unavailable");
                None
            }
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "Preview task failed");
                None
            }
        };

        {
            let mut state = self.lock();
            state.preview = preview;
            state.selected = Some(file.clone());
        }

        self.send(&file, uploading).await
    }

    /// POST the file to the upload endpoint.
    ///
    /// On failure the preview is cleared and one blocking notice is raised.
    pub async fn upload_file(&self, file: &SelectedFile) -> Result<(), UploadError> {
        let uploading = UploadingGuard::acquire(&self.state)?;
        self.send(file, uploading).await
    }

    async fn send(
        &self,
        file: &SelectedFile,
        _uploading: UploadingGuard<'_>,
    ) -> Result<(), UploadError> {
        tracing::info!(file = %file.name, bytes = file.len(), "Uploading image");
        match self.transport.upload_image(file).await {
            Ok(()) => {
                tracing::info!(file = %file.name, "Upload complete");
                Ok(())
            }
            Err(e) => {
                tracing::error!(file = %file.name, error = %e, "Upload failed");
                let stale = self.lock().preview.take();
                drop(stale);
                self.notifier.notify(Notice::blocking(TextKey::UploadFailed));
                Err(e.into())
            }
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.lock().uploading
    }

    pub fn selected(&self) -> Option<SelectedFile> {
        self.lock().selected.clone()
    }

    pub fn preview(&self) -> Option<PreviewHandle> {
        self.lock().preview.as_ref().map(|p| p.handle().clone())
    }

    /// Drop the selection and revoke its preview.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.selected = None;
        state.preview = None;
    }
}

/// Holds the uploading flag; clears it on drop even if the upload future is cancelled.
struct UploadingGuard<'a> {
    state: &'a Mutex<UploadState>,
}

impl<'a> UploadingGuard<'a> {
    fn acquire(state: &'a Mutex<UploadState>) -> Result<Self, UploadError> {
        let mut inner = state.lock().unwrap_or_else(PoisonError::into_inner);
        Self::claim(state, &mut inner)
    }

    /// Claim the slot through a lock the caller already holds on `state`.
    fn claim(
        state: &'a Mutex<UploadState>,
        inner: &mut UploadState,
    ) -> Result<Self, UploadError> {
        if inner.uploading {
            return Err(UploadError::Busy);
        }
        inner.uploading = true;
        Ok(Self { state })
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .uploading = false;
    }
}
