//! Thumbnail validation
//!
//! A declared thumbnail must sniff as an image before it is opened. Detection
//! failures are reported the same way as a wrong content type.

use super::types::UploadFile;
use crate::error::{Result, UploadError};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes read from the head of a file when sniffing its content type
const SNIFF_LIMIT: u64 = 3072;

/// Detects the MIME type of a file on disk
pub trait ContentSniffer {
    fn detect(&self, path: &Path) -> io::Result<String>;
}

/// Sniffs content by inspecting leading magic bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

impl MagicSniffer {
    /// Classify a buffer holding the head of a file
    pub fn detect_bytes(head: &[u8]) -> String {
        if let Ok(format) = image::guess_format(head) {
            return format.to_mime_type().to_string();
        }

        if !head.is_empty() && std::str::from_utf8(head).is_ok() {
            return "text/plain; charset=utf-8".to_string();
        }

        "application/octet-stream".to_string()
    }
}

impl ContentSniffer for MagicSniffer {
    fn detect(&self, path: &Path) -> io::Result<String> {
        let mut head = Vec::with_capacity(SNIFF_LIMIT as usize);
        File::open(path)?.take(SNIFF_LIMIT).read_to_end(&mut head)?;
        Ok(Self::detect_bytes(&head))
    }
}

/// Whether a MIME type names an image
pub fn is_image(mime: &str) -> bool {
    mime.split_once('/')
        .map_or(false, |(top, _)| top.trim().eq_ignore_ascii_case("image"))
}

/// Validate and open a thumbnail
///
/// Returns `Ok(None)` when no thumbnail is declared. The returned file has a
/// size of 0; the uploader measures it when needed.
///
/// # Errors
///
/// * [`UploadError::ThumbnailInvalid`] if detection fails or the file is not an image
/// * [`UploadError::ThumbnailOpen`] if the file cannot be opened
pub fn open_thumbnail<S: ContentSniffer + ?Sized>(
    sniffer: &S,
    path: Option<&Path>,
) -> Result<Option<UploadFile>> {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(None),
    };

    match sniffer.detect(path) {
        Ok(mime) if is_image(&mime) => {}
        Ok(mime) => {
            return Err(UploadError::thumbnail_invalid(
                path,
                format!("detected {}", mime),
            ))
        }
        Err(e) => return Err(UploadError::thumbnail_invalid(path, e.to_string())),
    }

    let file = File::open(path).map_err(|source| UploadError::ThumbnailOpen {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(UploadFile::new(file, path, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    struct FixedSniffer(io::Result<&'static str>);

    impl ContentSniffer for FixedSniffer {
        fn detect(&self, _path: &Path) -> io::Result<String> {
            match &self.0 {
                Ok(mime) => Ok(mime.to_string()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("image/jpeg"));
        assert!(is_image("IMAGE/png"));
        assert!(!is_image("image"));
        assert!(!is_image("video/mp4"));
        assert!(!is_image("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_detect_bytes() {
        assert_eq!(MagicSniffer::detect_bytes(PNG_HEADER), "image/png");
        assert_eq!(MagicSniffer::detect_bytes(JPEG_HEADER), "image/jpeg");
        assert_eq!(
            MagicSniffer::detect_bytes(b"hello"),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            MagicSniffer::detect_bytes(&[0x00, 0xFF, 0xFE]),
            "application/octet-stream"
        );
        assert_eq!(MagicSniffer::detect_bytes(&[]), "application/octet-stream");
    }

    #[test]
    fn test_no_thumbnail() {
        assert!(open_thumbnail(&MagicSniffer, None).unwrap().is_none());
        assert!(open_thumbnail(&MagicSniffer, Some(Path::new("")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_valid_thumbnail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let thumb = open_thumbnail(&MagicSniffer, Some(&path)).unwrap().unwrap();
        assert_eq!(thumb.size(), 0);
        assert_eq!(thumb.name(), "cover.png");
    }

    #[test]
    fn test_invalid_thumbnail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let err = open_thumbnail(&MagicSniffer, Some(&path)).unwrap_err();
        assert!(matches!(err, UploadError::ThumbnailInvalid { .. }));
    }

    #[test]
    fn test_detection_error_is_invalid_thumbnail() {
        let sniffer = FixedSniffer(Err(io::Error::new(io::ErrorKind::Other, "unreadable")));
        let err = open_thumbnail(&sniffer, Some(Path::new("/nowhere/t.jpg"))).unwrap_err();
        assert!(matches!(err, UploadError::ThumbnailInvalid { .. }));

        let err = open_thumbnail(&MagicSniffer, Some(Path::new("/nowhere/t.jpg"))).unwrap_err();
        assert!(matches!(err, UploadError::ThumbnailInvalid { .. }));
    }

    #[test]
    fn test_open_failure() {
        let sniffer = FixedSniffer(Ok("image/jpeg"));
        let err = open_thumbnail(&sniffer, Some(Path::new("/nowhere/t.jpg"))).unwrap_err();
        assert!(matches!(err, UploadError::ThumbnailOpen { .. }));
    }
}
