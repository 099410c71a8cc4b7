//! ZIP archive of page images.
//!
//! Entries are flat and named from the one-based page number padded to
//! three digits (`page_001.png`), so lexicographic order equals page order
//! for documents up to 999 pages. Page 1000 becomes `page_1000.png`, which
//! sorts before `page_101.png`; the width is kept fixed regardless.

use super::{entry_options, PageOrder, Packager};
use crate::config::OutputFormat;
use crate::error::PdfDeckError;
use crate::output::RasterPage;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::ZipWriter;

const FORMAT: &str = "zip";

/// Streams raster pages into an in-memory ZIP.
pub struct ArchivePackager {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    order: PageOrder,
    entries: usize,
}

impl ArchivePackager {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            order: PageOrder::default(),
            entries: 0,
        }
    }

    /// Archive entry name for zero-based `index`.
    pub fn entry_name(index: usize) -> String {
        format!("page_{:03}.png", index + 1)
    }

    /// Pack a whole ordered sequence in one call.
    pub fn pack(pages: impl IntoIterator<Item = RasterPage>) -> Result<Vec<u8>, PdfDeckError> {
        super::pack_all(Box::new(Self::new()), pages)
    }
}

impl Default for ArchivePackager {
    fn default() -> Self {
        Self::new()
    }
}

impl Packager for ArchivePackager {
    fn format(&self) -> OutputFormat {
        OutputFormat::Archive
    }

    fn add_page(&mut self, page: RasterPage) -> Result<(), PdfDeckError> {
        self.order.accept(page.index, FORMAT)?;

        let name = Self::entry_name(page.index);
        self.writer
            .start_file(name.as_str(), entry_options())
            .map_err(|e| PdfDeckError::packaging(FORMAT, e))?;
        self.writer
            .write_all(&page.data)
            .map_err(|e| PdfDeckError::packaging(FORMAT, e))?;

        self.entries += 1;
        debug!("Archived {} ({} bytes)", name, page.data.len());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.entries
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, PdfDeckError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| PdfDeckError::packaging(FORMAT, e))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn page(index: usize) -> RasterPage {
        RasterPage {
            index,
            data: format!("png-bytes-{index}").into_bytes(),
            width: 4,
            height: 3,
        }
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn entry_names_are_one_based_and_padded() {
        assert_eq!(ArchivePackager::entry_name(0), "page_001.png");
        assert_eq!(ArchivePackager::entry_name(41), "page_042.png");
        assert_eq!(ArchivePackager::entry_name(998), "page_999.png");
        assert_eq!(ArchivePackager::entry_name(999), "page_1000.png");
    }

    #[test]
    fn writes_entries_in_input_order() {
        let bytes = ArchivePackager::pack([page(0), page(2), page(3), page(4)]).unwrap();
        assert_eq!(
            entry_names(bytes),
            vec!["page_001.png", "page_003.png", "page_004.png", "page_005.png"]
        );
    }

    #[test]
    fn payload_round_trips_and_is_deflated() {
        let bytes = ArchivePackager::pack([page(7)]).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
        let mut body = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut body).unwrap();
        assert_eq!(body, b"png-bytes-7");
    }

    #[test]
    fn duplicate_page_is_rejected() {
        let err = ArchivePackager::pack([page(1), page(1)]).unwrap_err();
        assert!(matches!(err, PdfDeckError::PackagingFailed { format: "zip", .. }));
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        let a = ArchivePackager::pack([page(0), page(1)]).unwrap();
        let b = ArchivePackager::pack([page(0), page(1)]).unwrap();
        assert_eq!(a, b);
    }
}
