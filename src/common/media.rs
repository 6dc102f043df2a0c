//! # Media Model
//!
//! Every file the client touches is held as a [`Blob`]: a name, the media type
//! the file was *declared* with, and its raw bytes. Content is never sniffed;
//! classification only looks at the declared type and the file name.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// File name suffix that marks a recovery-data member. Case-sensitive.
pub const RECOVERY_SUFFIX: &str = ".npy";

/// Declared media type of a blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaType {
    Png,
    Jpeg,
    Tiff,
    Heic,
    Zip,
    /// `application/x-npy`, the declared type of a recovery-data blob
    Npy,
    OctetStream,
    Other(String),
}

impl MediaType {
    /// Parse a MIME string as a browser or a `Content-Type` header would
    /// declare it. Parameters after `;` are dropped.
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(MediaType::from_mime("image/png; charset=binary"), MediaType::Png);
    /// ```
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default();
        match essence.trim().to_ascii_lowercase().as_str() {
            "image/png" => MediaType::Png,
            "image/jpeg" | "image/jpg" => MediaType::Jpeg,
            "image/tiff" => MediaType::Tiff,
            "image/heic" => MediaType::Heic,
            "application/zip" | "application/x-zip-compressed" => MediaType::Zip,
            "application/x-npy" => MediaType::Npy,
            "application/octet-stream" => MediaType::OctetStream,
            other => MediaType::Other(other.to_string()),
        }
    }

    /// Declared type for a local file, taken from its extension.
    ///
    /// Unknown extensions come out as `application/octet-stream`, which is
    /// what a file picker reports for them.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => MediaType::Png,
            Some("jpg") | Some("jpeg") => MediaType::Jpeg,
            Some("tif") | Some("tiff") => MediaType::Tiff,
            Some("heic") => MediaType::Heic,
            Some("zip") => MediaType::Zip,
            Some("npy") => MediaType::Npy,
            _ => MediaType::OctetStream,
        }
    }

    pub fn mime(&self) -> &str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Tiff => "image/tiff",
            MediaType::Heic => "image/heic",
            MediaType::Zip => "application/zip",
            MediaType::Npy => "application/x-npy",
            MediaType::OctetStream => "application/octet-stream",
            MediaType::Other(mime) => mime.as_str(),
        }
    }

    pub fn is_image(&self) -> bool {
        match self {
            MediaType::Png | MediaType::Jpeg | MediaType::Tiff | MediaType::Heic => true,
            MediaType::Other(mime) => mime.starts_with("image/"),
            _ => false,
        }
    }

    /// Encodings the encode endpoint accepts as input.
    pub fn is_encodable_image(&self) -> bool {
        matches!(
            self,
            MediaType::Png | MediaType::Jpeg | MediaType::Tiff | MediaType::Heic
        )
    }

    pub fn is_archive(&self) -> bool {
        *self == MediaType::Zip
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// An in-memory file with its declared media type.
///
/// Bytes are shared behind an `Arc`, so handing the same blob to a slot, a
/// preview and an outgoing request never copies the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    name: String,
    media_type: MediaType,
    bytes: Arc<Vec<u8>>,
}

impl Blob {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes: Arc::new(bytes),
        }
    }

    /// Read a local file, declaring its type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, MediaType::from_path(path), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the name ends in the recovery suffix or the blob was
    /// declared as `application/x-npy`.
    pub fn is_recovery_data(&self) -> bool {
        self.name.ends_with(RECOVERY_SUFFIX) || self.media_type == MediaType::Npy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_suffix_is_case_sensitive() {
        let lower = Blob::new("recovery_data.npy", MediaType::OctetStream, vec![1]);
        let upper = Blob::new("RECOVERY_DATA.NPY", MediaType::OctetStream, vec![1]);

        assert!(lower.is_recovery_data());
        assert!(!upper.is_recovery_data());
    }

    #[test]
    fn test_declared_npy_counts_as_recovery() {
        let blob = Blob::new("blob", MediaType::Npy, vec![]);
        assert!(blob.is_recovery_data());
    }

    #[test]
    fn test_media_type_from_path_and_mime() {
        assert_eq!(MediaType::from_path(Path::new("photo.JPG")), MediaType::Jpeg);
        assert_eq!(MediaType::from_path(Path::new("pkg.zip")), MediaType::Zip);
        assert_eq!(MediaType::from_path(Path::new("notes")), MediaType::OctetStream);
        assert_eq!(MediaType::from_mime("image/heic"), MediaType::Heic);
        assert!(MediaType::from_mime("image/webp").is_image());
        assert!(!MediaType::from_mime("image/webp").is_encodable_image());
    }

    #[test]
    fn test_mime_parameters_are_ignored() {
        assert_eq!(MediaType::from_mime("image/png; charset=binary"), MediaType::Png);
        assert_eq!(MediaType::from_mime("Application/ZIP ;foo=bar"), MediaType::Zip);
        assert_eq!(
            MediaType::from_mime("text/plain; charset=utf-8"),
            MediaType::Other("text/plain".to_string())
        );
    }
}
