//! Error types for the pdfdeck library.
//!
//! Every failure is fatal for the request: a conversion either produces a
//! complete archive or deck, or it returns `Err(PdfDeckError)` before any
//! output bytes reach the caller. There is no per-page error type because a
//! half-rendered deck is never handed out.
//!
//! Malformed page-range tokens are *not* errors. They are dropped by
//! [`crate::range::parse_page_range`]; only an empty resolved selection is
//! rejected, as [`PdfDeckError::InvalidPageSelection`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfdeck library.
#[derive(Debug, Error)]
pub enum PdfDeckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes were read, but they do not start with a PDF header.
    #[error("Input is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The rendering engine could not parse the document.
    #[error("PDF is corrupt or unsupported: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for encrypted PDF")]
    WrongPassword,

    // ── Selection errors ──────────────────────────────────────────────────
    /// The page selection resolved to no pages at all.
    #[error("No valid pages in selection '{selection}' (document has {total} pages)")]
    InvalidPageSelection { selection: String, total: usize },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The rasteriser was asked for a page the document does not have.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium or the PNG encoder failed on a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The archive or slide writer failed.
    #[error("Failed to build {format} output: {detail}")]
    PackagingFailed {
        format: &'static str,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation or option parsing failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide so the dynamic loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification a delivery layer can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The user's page selection matched nothing.
    InvalidPageSelection,
    /// The input is missing, unreadable, or not a usable PDF.
    DocumentLoad,
    /// Rendering or packaging failed after the document opened.
    Render,
    /// Host problem: configuration, pdfium binding, file system.
    Environment,
}

impl PdfDeckError {
    /// Map the error onto the user-facing taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPageSelection { .. } => ErrorCategory::InvalidPageSelection,
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::NotAPdf { .. }
            | Self::CorruptPdf { .. }
            | Self::PasswordRequired
            | Self::WrongPassword => ErrorCategory::DocumentLoad,
            Self::PageOutOfRange { .. }
            | Self::RasterisationFailed { .. }
            | Self::PackagingFailed { .. } => ErrorCategory::Render,
            Self::OutputWriteFailed { .. }
            | Self::InvalidConfig(_)
            | Self::PdfiumBindingFailed(_)
            | Self::Internal(_) => ErrorCategory::Environment,
        }
    }

    pub(crate) fn packaging(format: &'static str, detail: impl ToString) -> Self {
        Self::PackagingFailed {
            format,
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_selection_display() {
        let e = PdfDeckError::InvalidPageSelection {
            selection: "9".into(),
            total: 5,
        };
        let msg = e.to_string();
        assert!(msg.contains("'9'"), "got: {msg}");
        assert!(msg.contains("5 pages"), "got: {msg}");
        assert_eq!(e.category(), ErrorCategory::InvalidPageSelection);
    }

    #[test]
    fn page_out_of_range_is_render_error() {
        let e = PdfDeckError::PageOutOfRange { page: 12, total: 10 };
        assert!(e.to_string().contains("Page 12"));
        assert_eq!(e.category(), ErrorCategory::Render);
    }

    #[test]
    fn load_errors_share_a_category() {
        for e in [
            PdfDeckError::PasswordRequired,
            PdfDeckError::WrongPassword,
            PdfDeckError::CorruptPdf {
                detail: "xref".into(),
            },
            PdfDeckError::NotAPdf {
                path: "<memory>".into(),
                magic: *b"PK\x03\x04",
            },
        ] {
            assert_eq!(e.category(), ErrorCategory::DocumentLoad, "{e}");
        }
    }

    #[test]
    fn packaging_helper_display() {
        let e = PdfDeckError::packaging("zip", "disk full");
        assert!(e.to_string().contains("zip"));
        assert!(e.to_string().contains("disk full"));
    }
}
