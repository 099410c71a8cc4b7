//! Rendering engine seam: the [`PageSource`] trait and its pdfium backend.
//!
//! The rest of the crate only needs two capabilities from a document: how
//! many pages it has, and a raster of page `i` at scale `s`. [`PageSource`]
//! captures exactly that, so the orchestrator and packagers can be exercised
//! with synthetic pages while production uses [`PdfiumDocument`].
//!
//! ## Binding order
//!
//! [`bind_pdfium`] tries, first match wins:
//!
//! 1. `PDFIUM_LIB_PATH` (a library file or the directory holding it)
//! 2. the platform library name in the working directory
//! 3. the system dynamic loader

use crate::error::PdfDeckError;
use crate::output::DocumentInfo;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// A read-only, already-open paginated document.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterise page `index` (zero-based) with both axes scaled by `scale`.
    ///
    /// Implementations may return an image with an alpha channel; the
    /// encoder flattens it.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, PdfDeckError>;
}

/// Bind to a pdfium shared library.
pub fn bind_pdfium() -> Result<Pdfium, PdfDeckError> {
    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        let mut path = PathBuf::from(env_path);
        if path.is_dir() {
            path = Pdfium::pdfium_platform_library_name_at_path(&path);
        }
        debug!("Binding pdfium from PDFIUM_LIB_PATH: {}", path.display());
        return Pdfium::bind_to_library(&path)
            .map(Pdfium::new)
            .map_err(|e| {
                PdfDeckError::PdfiumBindingFailed(format!("{}: {e:?}", path.display()))
            });
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| PdfDeckError::PdfiumBindingFailed(format!("{e:?}")))
}

/// An open pdfium document. Dropping it closes the document.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    page_count: usize,
}

impl<'a> PdfiumDocument<'a> {
    /// Load a document from memory.
    ///
    /// # Errors
    /// [`PdfDeckError::PasswordRequired`], [`PdfDeckError::WrongPassword`] or
    /// [`PdfDeckError::CorruptPdf`] when pdfium refuses the bytes.
    pub fn open(
        pdfium: &'a Pdfium,
        bytes: &'a [u8],
        password: Option<&'a str>,
    ) -> Result<Self, PdfDeckError> {
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        PdfDeckError::WrongPassword
                    } else {
                        PdfDeckError::PasswordRequired
                    }
                } else {
                    PdfDeckError::CorruptPdf { detail: err_str }
                }
            })?;

        let page_count = document.pages().len() as usize;
        info!("PDF loaded: {} pages", page_count);
        Ok(Self {
            document,
            page_count,
        })
    }

    /// Document properties, without rendering anything.
    pub fn info(&self) -> DocumentInfo {
        let metadata = self.document.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentInfo {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            page_count: self.page_count,
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, PdfDeckError> {
        let page_index = u16::try_from(index).map_err(|_| PdfDeckError::PageOutOfRange {
            page: index + 1,
            total: self.page_count,
        })?;

        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| PdfDeckError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(scale)
            .set_clear_color(PdfColor::WHITE)
            .render_form_data(true);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfDeckError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        Ok(bitmap.as_image())
    }
}
