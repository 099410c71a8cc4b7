//! Output packaging: raster pages in, one container file out.
//!
//! Both output formats share the rendering step and differ only in how the
//! PNGs are wrapped, so the orchestrator talks to a `Box<dyn Packager>`
//! chosen once by [`packager_for`]:
//!
//! | Format | Packager | Layout |
//! |--------|----------|--------|
//! | [`OutputFormat::Archive`] | [`ArchivePackager`] | flat `page_NNN.png` entries |
//! | [`OutputFormat::SlideDeck`] | [`SlidePackager`] | one picture slide per page |
//!
//! Packagers stream: each page is written as it arrives and dropped, so peak
//! memory is one raster plus the growing container. They refuse pages that
//! do not arrive in strictly ascending index order.

pub mod archive;
mod pptx_parts;
pub mod slides;

pub use archive::ArchivePackager;
pub use slides::SlidePackager;

use crate::config::{OutputFormat, SlideSize};
use crate::error::PdfDeckError;
use crate::output::RasterPage;

/// Serialises an ordered sequence of raster pages into one output file.
pub trait Packager {
    /// The format this packager produces.
    fn format(&self) -> OutputFormat;

    /// Append the next page. Its index must exceed every earlier page's.
    fn add_page(&mut self, page: RasterPage) -> Result<(), PdfDeckError>;

    /// Number of pages accepted so far.
    fn page_count(&self) -> usize;

    /// Finalise the container and return its bytes.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, PdfDeckError>;
}

/// Pick the packager for `format`.
pub fn packager_for(format: OutputFormat, slide_size: SlideSize) -> Box<dyn Packager> {
    match format {
        OutputFormat::Archive => Box::new(ArchivePackager::new()),
        OutputFormat::SlideDeck => Box::new(SlidePackager::new(slide_size)),
    }
}

/// Feed every page through `packager` and finish it.
pub fn pack_all(
    mut packager: Box<dyn Packager>,
    pages: impl IntoIterator<Item = RasterPage>,
) -> Result<Vec<u8>, PdfDeckError> {
    for page in pages {
        packager.add_page(page)?;
    }
    packager.finish()
}

/// Tracks the last accepted index so pages can't repeat or go backwards.
#[derive(Debug, Default)]
pub(crate) struct PageOrder {
    last: Option<usize>,
}

impl PageOrder {
    pub(crate) fn accept(&mut self, index: usize, format: &'static str) -> Result<(), PdfDeckError> {
        if let Some(last) = self.last {
            if index <= last {
                return Err(PdfDeckError::packaging(
                    format,
                    format!(
                        "page {} arrived after page {}; pages must be strictly ascending",
                        index + 1,
                        last + 1
                    ),
                ));
            }
        }
        self.last = Some(index);
        Ok(())
    }
}

/// Shared zip entry options: deflate and a fixed timestamp, so identical
/// input yields identical bytes.
pub(crate) fn entry_options() -> zip::write::SimpleFileOptions {
    zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_order_rejects_repeats_and_regressions() {
        let mut order = PageOrder::default();
        order.accept(0, "zip").unwrap();
        order.accept(4, "zip").unwrap();
        assert!(order.accept(4, "zip").is_err());
        assert!(order.accept(2, "zip").is_err());
        order.accept(5, "zip").unwrap();
    }

    #[test]
    fn packager_for_selects_by_format() {
        let zip = packager_for(OutputFormat::Archive, SlideSize::default());
        assert_eq!(zip.format(), OutputFormat::Archive);
        let deck = packager_for(OutputFormat::SlideDeck, SlideSize::default());
        assert_eq!(deck.format(), OutputFormat::SlideDeck);
        assert_eq!(deck.page_count(), 0);
    }
}
