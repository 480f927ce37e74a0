//! Image upload side effects: file selection, preview lifecycle, upload.
//!
//! Previews are scoped resources. Each one is revoked exactly once, when it
//! is replaced by a newer selection, cleared after a failed upload, or when
//! the owning [`UploadHandler`] is dropped.

pub mod error;
pub mod file;
pub mod handler;
pub mod preview;

pub use error::UploadError;
pub use file::load_file;
pub use handler::UploadHandler;
pub use preview::{DiskPreviewProvider, Preview, PreviewHandle, PreviewProvider};
