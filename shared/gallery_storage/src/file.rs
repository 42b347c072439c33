//! Files offered for upload

use std::fmt;
use std::io;
use std::path::Path;

const IMAGE_MIME_PREFIX: &str = "image/";

/// A file offered for upload, with its reported name, MIME type and contents
#[derive(Clone, PartialEq, Eq)]
pub struct UploadableFile {
    /// File name as reported by the client, without any directory
    pub name: String,
    /// MIME type as reported by the client
    pub mime_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadableFile {
    /// Creates a file from already-read parts
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a local file, guessing its MIME type from the extension
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the path has no usable file name or the file
    /// cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no usable file name", path.display()),
                )
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, mime_type, bytes))
    }

    /// Whether the reported MIME type is an image type
    ///
    /// Only the reported type is inspected, never the contents.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with(IMAGE_MIME_PREFIX)
    }

    /// Size of the contents in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for UploadableFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadableFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}
