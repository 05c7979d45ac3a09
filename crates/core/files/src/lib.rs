use std::path::Path;

use base64::prelude::*;
use bytes::Bytes;
use campusfix_config::report_internal_error;
use campusfix_result::Result;

mod compression;

pub use compression::*;

/// Content type used when the file signature is not recognised
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// File selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original filename
    pub name: String,
    /// Content type sent with the multipart field
    pub content_type: String,
    /// Raw file contents
    pub data: Bytes,
}

impl UploadFile {
    /// Create a file from memory, detecting its content type
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> UploadFile {
        let data = data.into();
        UploadFile {
            name: name.into(),
            content_type: determine_mime_type(&data).to_owned(),
            data,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<UploadFile> {
        let path = path.as_ref();
        let data = report_internal_error!(tokio::fs::read(path).await)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed-file".to_owned());

        Ok(UploadFile::new(name, data))
    }

    /// Size of this file (in bytes)
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the content type is an image
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Inline preview of this file
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            BASE64_STANDARD.encode(&self.data)
        )
    }
}

/// Determine the mime type from the file's magic signature
pub fn determine_mime_type(buf: &[u8]) -> &'static str {
    infer::get(buf)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn detects_content_type_from_signature() {
        let file = UploadFile::new("tap.bin", PNG_SIGNATURE.to_vec());
        assert_eq!(file.content_type, "image/png");
        assert!(file.is_image());

        let file = UploadFile::new("notes.txt", b"the tap is leaking".to_vec());
        assert_eq!(file.content_type, FALLBACK_MIME_TYPE);
        assert!(!file.is_image());
    }

    #[test]
    fn builds_data_url_preview() {
        let file = UploadFile {
            name: "a.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            data: Bytes::from_static(b"hi"),
        };
        assert_eq!(file.to_data_url(), "data:image/jpeg;base64,aGk=");
    }

    #[tokio::test]
    async fn reading_missing_file_is_an_error() {
        let error = UploadFile::from_path("/nonexistent/campusfix/photo.jpg")
            .await
            .unwrap_err();
        assert!(matches!(
            error.error_type,
            campusfix_result::ErrorType::InternalError
        ));
    }
}
