//! Values that flow through and out of the pipeline.

use crate::config::{ConversionConfig, OutputFormat, PageSelection, QualityProfile};
use crate::error::PdfDeckError;
use crate::range::{parse_page_range, PageIndexSet};
use serde::{Deserialize, Serialize};

/// One rendered page: opaque PNG bytes plus enough metadata to name and place it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    /// Zero-based source index, used for ordering.
    pub index: usize,
    /// Encoded lossless image, no alpha channel.
    pub data: Vec<u8>,
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
}

impl RasterPage {
    /// One-based display number, used for entry and slide names.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }
}

/// Everything the orchestrator needs to know about one request.
///
/// Immutable once resolved; the page set is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub total_pages: usize,
    pub pages: PageIndexSet,
    pub quality: QualityProfile,
    pub format: OutputFormat,
}

impl ConversionRequest {
    /// Apply the config's page selection to a document of `total_pages`.
    ///
    /// # Errors
    /// [`PdfDeckError::InvalidPageSelection`] when nothing is selected.
    pub fn resolve(config: &ConversionConfig, total_pages: usize) -> Result<Self, PdfDeckError> {
        let pages = match &config.pages {
            PageSelection::All => PageIndexSet::all(total_pages),
            PageSelection::Range(text) => parse_page_range(text, total_pages),
        };
        if pages.is_empty() {
            return Err(PdfDeckError::InvalidPageSelection {
                selection: config.pages.to_string(),
                total: total_pages,
            });
        }
        Ok(Self {
            total_pages,
            pages,
            quality: config.quality,
            format: config.format,
        })
    }
}

/// Final output of a conversion, ready for delivery.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The complete `.zip` or `.pptx` file.
    pub bytes: Vec<u8>,
    /// `zip` or `pptx`.
    pub extension: &'static str,
    /// MIME type matching `extension`.
    pub content_type: &'static str,
    /// Name stem from the config, without extension.
    pub stem: String,
    pub stats: ConversionStats,
}

impl ConversionResult {
    /// Suggested download name, e.g. `converted_result.zip`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.extension)
    }
}

/// Counters and timings for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages rendered and packaged.
    pub converted_pages: usize,
    pub quality: QualityProfile,
    pub format: OutputFormat,
    pub render_duration_ms: u64,
    pub package_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Size of the produced container.
    pub output_bytes: usize,
}

/// Document properties reported by [`crate::inspect`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_all_bypasses_parser() {
        let config = ConversionConfig::default();
        let req = ConversionRequest::resolve(&config, 3).unwrap();
        assert_eq!(req.pages.as_slice(), &[0, 1, 2]);
        assert_eq!(req.total_pages, 3);
    }

    #[test]
    fn resolve_rejects_empty_selection() {
        let config = ConversionConfig::builder()
            .pages(PageSelection::Range("9".into()))
            .build()
            .unwrap();
        let err = ConversionRequest::resolve(&config, 5).unwrap_err();
        assert!(matches!(
            err,
            PdfDeckError::InvalidPageSelection { total: 5, .. }
        ));
    }

    #[test]
    fn resolve_blank_range_means_all() {
        let config = ConversionConfig::builder()
            .pages(PageSelection::Range("  ".into()))
            .build()
            .unwrap();
        let req = ConversionRequest::resolve(&config, 2).unwrap();
        assert_eq!(req.pages.as_slice(), &[0, 1]);
    }

    #[test]
    fn file_name_uses_stem_and_extension() {
        let result = ConversionResult {
            bytes: vec![],
            extension: "pptx",
            content_type: OutputFormat::SlideDeck.content_type(),
            stem: "converted_result".into(),
            stats: ConversionStats::default(),
        };
        assert_eq!(result.file_name(), "converted_result.pptx");
    }

    #[test]
    fn raster_page_num_is_one_based() {
        let page = RasterPage {
            index: 0,
            data: vec![],
            width: 1,
            height: 1,
        };
        assert_eq!(page.page_num(), 1);
    }
}
