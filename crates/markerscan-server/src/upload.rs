//! Multipart extraction and upload validation.

use crate::ApiError;
use axum::body::Bytes;
use axum::extract::Multipart;

/// Accepted file-name extensions (lower case, with the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".bmp", ".tiff", ".webp"];

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The `file` field of a multipart request.
#[derive(Clone, Debug)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// File name for logs and response headers.
    pub fn display_name(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "unknown",
        }
    }
}

/// Pull the `file` field out of a multipart body; other fields are skipped.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(Upload {
            filename,
            content_type,
            bytes,
        });
    }
    Err(ApiError::MissingFile)
}

/// Check size, extension and declared content type.
pub fn validate(upload: &Upload, max_bytes: usize) -> Result<(), ApiError> {
    if upload.bytes.is_empty() {
        return Err(ApiError::MissingFile);
    }
    if upload.bytes.len() > max_bytes {
        return Err(ApiError::TooLarge { max_bytes });
    }

    if let Some(name) = upload.filename.as_deref().filter(|n| !n.is_empty()) {
        let extension = match name.rsplit_once('.') {
            Some((_, ext)) => format!(".{}", ext.to_lowercase()),
            None => format!(".{}", name.to_lowercase()),
        };
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::UnsupportedFormat {
                extension,
                supported: SUPPORTED_EXTENSIONS.join(", "),
            });
        }
    }

    if let Some(ct) = upload.content_type.as_deref().filter(|c| !c.is_empty()) {
        if !ct.starts_with("image/") {
            return Err(ApiError::InvalidContentType(ct.to_owned()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: Option<&str>, ct: Option<&str>, len: usize) -> Upload {
        Upload {
            filename: name.map(str::to_owned),
            content_type: ct.map(str::to_owned),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn accepts_supported_images() {
        for name in ["a.png", "photo.JPG", "scan.final.tiff", "x.webp"] {
            let png = upload(Some(name), Some("image/png"), 10);
            assert!(validate(&png, 100).is_ok(), "{name}");
        }
        assert!(validate(&upload(None, None, 10), 100).is_ok());
    }

    #[test]
    fn rejects_bad_extension_and_content_type() {
        let err = validate(&upload(Some("notes.txt"), Some("image/png"), 10), 100).unwrap_err();
        match err {
            ApiError::UnsupportedFormat { extension, .. } => assert_eq!(extension, ".txt"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = validate(&upload(Some("noext"), None, 10), 100).unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFormat { .. }));

        let err = validate(&upload(Some("a.png"), Some("text/plain"), 10), 100).unwrap_err();
        assert!(matches!(err, ApiError::InvalidContentType(_)));
    }

    #[test]
    fn size_limits() {
        let err = validate(&upload(Some("a.png"), None, 101), 100).unwrap_err();
        assert!(matches!(err, ApiError::TooLarge { .. }));
        assert!(validate(&upload(Some("a.png"), None, 100), 100).is_ok());

        let err = validate(&upload(Some("a.png"), None, 0), 100).unwrap_err();
        assert!(matches!(err, ApiError::MissingFile));
    }

    #[test]
    fn display_name_defaults_to_unknown() {
        assert_eq!(upload(None, None, 1).display_name(), "unknown");
        assert_eq!(upload(Some(""), None, 1).display_name(), "unknown");
        assert_eq!(upload(Some("m.png"), None, 1).display_name(), "m.png");
    }
}
