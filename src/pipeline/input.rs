//! Input resolution: read a local PDF into memory and validate its header.
//!
//! Checking the `%PDF` magic before handing bytes to pdfium gives callers a
//! precise [`PdfDeckError::NotAPdf`] instead of a generic parse failure.

use crate::error::PdfDeckError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholder path used in errors for in-memory input.
pub const MEMORY_INPUT: &str = "<memory>";

/// Read a local file, validating existence, permissions and PDF magic bytes.
pub async fn read_pdf(path: &Path) -> Result<Vec<u8>, PdfDeckError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| map_read_error(path, e))?;
    check_magic(&bytes, path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Blocking twin of [`read_pdf`].
pub fn read_pdf_blocking(path: &Path) -> Result<Vec<u8>, PdfDeckError> {
    let bytes = std::fs::read(path).map_err(|e| map_read_error(path, e))?;
    check_magic(&bytes, path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Reject buffers that do not start with `%PDF`.
///
/// Buffers shorter than four bytes are left for pdfium to reject.
pub fn check_magic(bytes: &[u8], origin: &Path) -> Result<(), PdfDeckError> {
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(PdfDeckError::NotAPdf {
            path: origin.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

fn map_read_error(path: &Path, e: std::io::Error) -> PdfDeckError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => PdfDeckError::PermissionDenied { path },
        _ => PdfDeckError::FileNotFound { path },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn magic_accepts_pdf_header() {
        assert!(check_magic(b"%PDF-1.7\n", Path::new(MEMORY_INPUT)).is_ok());
    }

    #[test]
    fn magic_rejects_zip_header() {
        let err = check_magic(b"PK\x03\x04rest", Path::new("a.pdf")).unwrap_err();
        match err {
            PdfDeckError::NotAPdf { magic, path } => {
                assert_eq!(&magic, b"PK\x03\x04");
                assert_eq!(path, PathBuf::from("a.pdf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_pdf_blocking(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, PdfDeckError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn reads_file_with_pdf_magic() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.4\n%fake").unwrap();
        let bytes = read_pdf(tmp.path()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn rejects_non_pdf_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello world").unwrap();
        let err = read_pdf(tmp.path()).await.unwrap_err();
        assert!(matches!(err, PdfDeckError::NotAPdf { .. }));
    }
}
