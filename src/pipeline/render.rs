//! Page rasterisation at a quality tier's scale factor.
//!
//! The [`Rasterizer`] borrows an open [`PageSource`] read-only and holds the
//! scale derived from a [`QualityProfile`]. Each call renders exactly one
//! page and returns an encoded [`RasterPage`]; there is no state carried
//! between calls.

use crate::config::QualityProfile;
use crate::error::PdfDeckError;
use crate::output::RasterPage;
use crate::pipeline::encode;
use crate::pipeline::engine::PageSource;
use tracing::debug;

/// Renders pages of one document at one scale.
pub struct Rasterizer<'s, S: PageSource + ?Sized> {
    source: &'s S,
    scale: f32,
}

impl<'s, S: PageSource + ?Sized> Rasterizer<'s, S> {
    pub fn new(source: &'s S, profile: QualityProfile) -> Self {
        Self {
            source,
            scale: profile.scale_factor(),
        }
    }

    /// Render and encode the page at zero-based `index`.
    ///
    /// # Errors
    /// [`PdfDeckError::PageOutOfRange`] if `index` is past the end of the
    /// document. A resolved page set never contains such an index, so this
    /// signals a caller bug rather than bad user input.
    pub fn render(&self, index: usize) -> Result<RasterPage, PdfDeckError> {
        let total = self.source.page_count();
        if index >= total {
            return Err(PdfDeckError::PageOutOfRange {
                page: index + 1,
                total,
            });
        }

        let image = self.source.render_page(index, self.scale)?;
        let png = encode::encode_png(&image).map_err(|e| PdfDeckError::RasterisationFailed {
            page: index + 1,
            detail: format!("PNG encoding failed: {}", e),
        })?;

        debug!(
            "Rendered page {} → {}x{} px ({} bytes)",
            index + 1,
            png.width,
            png.height,
            png.data.len()
        );

        Ok(RasterPage {
            index,
            data: png.data,
            width: png.width,
            height: png.height,
        })
    }
}
