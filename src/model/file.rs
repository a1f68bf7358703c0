//! The file a user picked or dropped.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;

use crate::constants::{ACCEPTED_EXTENSIONS, FALLBACK_MEDIA_TYPE, MAX_FILE_SIZE_MB};

/// Errors that can occur while reading a selected file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// I/O error from the native filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Browser FileReader reported an error
    #[error("FileReader error: {0}")]
    Browser(String),

    /// The source can't be read by this host
    #[error("file source not readable on this platform")]
    Unsupported,
}

/// Where a selected file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory
    Bytes(Arc<[u8]>),
    /// A file on the local filesystem
    #[cfg(not(target_arch = "wasm32"))]
    Path(PathBuf),
    /// A browser `File` handed over by an input or a drop
    #[cfg(target_arch = "wasm32")]
    Browser(web_sys::File),
}

impl FileSource {
    /// Read the whole source synchronously.
    ///
    /// Browser files can only be read through a `FileReader` callback.
    pub fn read_blocking(&self) -> Result<Vec<u8>, ReadError> {
        match self {
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
            #[cfg(not(target_arch = "wasm32"))]
            FileSource::Path(path) => Ok(std::fs::read(path)?),
            #[cfg(target_arch = "wasm32")]
            FileSource::Browser(_) => Err(ReadError::Unsupported),
        }
    }
}

/// A single user-selected file. Replaced, never mutated, on a new selection.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    media_type: String,
    size: Option<u64>,
    source: FileSource,
}

impl SelectedFile {
    /// Create a file with an explicit declared media type.
    ///
    /// An empty media type falls back to `application/octet-stream`.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, source: FileSource) -> Self {
        let media_type = media_type.into();
        let media_type = if media_type.is_empty() {
            FALLBACK_MEDIA_TYPE.to_string()
        } else {
            media_type
        };
        Self {
            name: name.into(),
            media_type,
            size: None,
            source,
        }
    }

    /// In-memory file whose media type is derived from its name.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let bytes: Arc<[u8]> = bytes.into();
        let media_type = media_type_for_name(&name);
        let size = bytes.len() as u64;
        Self::new(name, media_type, FileSource::Bytes(bytes)).with_size(size)
    }

    /// File on disk. Size comes from metadata when available.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type_for_name(&name);
        let size = std::fs::metadata(path).ok().map(|m| m.len());

        let mut file = Self::new(name, media_type, FileSource::Path(path.to_path_buf()));
        file.size = size;
        file
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }
}

/// Media type for a file name, the way a browser fills in `File.type`.
pub fn media_type_for_name(name: &str) -> &'static str {
    ImageFormat::from_path(name)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// Type and size hints given to the picker.
///
/// These are advisory: drag-and-drop bypasses the picker's filter, and the
/// engine only checks them when configured to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerHints {
    /// Lower-case extensions without the leading dot
    pub accepted_extensions: Vec<String>,
    /// Maximum size in megabytes
    pub max_file_size_mb: u64,
}

impl PickerHints {
    /// The `accept` attribute value, e.g. `.jpg, .jpeg, .png`.
    pub fn accept_attribute(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Help line shown under the dropzone.
    pub fn help_text(&self) -> String {
        format!("Maximum file size {}MB.", self.max_file_size_mb)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Whether the file matches the advertised extensions and size.
    ///
    /// A file with unknown size passes the size check.
    pub fn permits(&self, file: &SelectedFile) -> bool {
        let lower = file.name().to_lowercase();
        let extension_ok = self
            .accepted_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)));
        let size_ok = file
            .size()
            .is_none_or(|size| size <= self.max_file_size_bytes());
        extension_ok && size_ok
    }
}

impl Default for PickerHints {
    fn default() -> Self {
        Self {
            accepted_extensions: ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_file_size_mb: MAX_FILE_SIZE_MB,
        }
    }
}
