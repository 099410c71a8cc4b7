//! PPTX slide deck with one full-bleed picture per page.
//!
//! Every slide uses the blank layout and holds a single picture scaled to
//! the slide width with its aspect ratio kept, then centred vertically.
//! Pages taller than the slide at that width overflow the bottom edge
//! rather than being shrunk to fit.
//!
//! Static parts are written when the packager is created and each page's
//! media, slide and slide relationships as it arrives. The parts that list
//! every slide (`presentation.xml`, its rels, `[Content_Types].xml`,
//! `docProps/app.xml`) wait for [`Packager::finish`].

use super::pptx_parts as parts;
use super::{entry_options, PageOrder, Packager};
use crate::config::{OutputFormat, SlideSize};
use crate::error::PdfDeckError;
use crate::output::RasterPage;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::ZipWriter;

const FORMAT: &str = "pptx";

/// Picture placement on a slide, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PicturePlacement {
    pub x: u64,
    pub y: u64,
    pub cx: u64,
    pub cy: u64,
}

/// Fit an `img_w`×`img_h` image to the full slide width.
///
/// The height is rounded to the nearest EMU. The top offset centres the
/// picture when it is shorter than the slide and is `0` otherwise.
/// `img_w` must be non-zero.
pub fn fit_to_width(img_w: u32, img_h: u32, slide_w: u64, slide_h: u64) -> PicturePlacement {
    let (w, h) = (u128::from(img_w), u128::from(img_h));
    let sw = u128::from(slide_w);
    let cy = ((sw * h + w / 2) / w) as u64;
    let y = if cy < slide_h { (slide_h - cy) / 2 } else { 0 };
    PicturePlacement {
        x: 0,
        y,
        cx: slide_w,
        cy,
    }
}

/// Streams raster pages into an in-memory PPTX.
pub struct SlidePackager {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    width: u64,
    height: u64,
    order: PageOrder,
    slides: usize,
    /// First write error from `new`, reported on the next call.
    deferred: Option<PdfDeckError>,
}

impl SlidePackager {
    pub fn new(slide_size: SlideSize) -> Self {
        let (width, height) = slide_size.dimensions();
        let mut packager = Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            width,
            height,
            order: PageOrder::default(),
            slides: 0,
            deferred: None,
        };
        if let Err(e) = packager.write_static_parts() {
            packager.deferred = Some(e);
        }
        packager
    }

    /// Pack a whole ordered sequence in one call.
    pub fn pack(
        pages: impl IntoIterator<Item = RasterPage>,
        slide_size: SlideSize,
    ) -> Result<Vec<u8>, PdfDeckError> {
        super::pack_all(Box::new(Self::new(slide_size)), pages)
    }

    fn write_static_parts(&mut self) -> Result<(), PdfDeckError> {
        self.write_part("_rels/.rels", &parts::package_rels())?;
        self.write_part("docProps/core.xml", &parts::core_props())?;
        self.write_part("ppt/slideMasters/slideMaster1.xml", &parts::slide_master())?;
        self.write_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels(),
        )?;
        self.write_part("ppt/slideLayouts/slideLayout1.xml", &parts::blank_layout())?;
        self.write_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::blank_layout_rels(),
        )?;
        self.write_part("ppt/theme/theme1.xml", &parts::theme())?;
        self.write_part("ppt/presProps.xml", &parts::pres_props())?;
        self.write_part("ppt/viewProps.xml", &parts::view_props())?;
        self.write_part("ppt/tableStyles.xml", &parts::table_styles())?;
        Ok(())
    }

    fn write_part(&mut self, name: &str, body: &str) -> Result<(), PdfDeckError> {
        self.write_bytes(name, body.as_bytes())
    }

    fn write_bytes(&mut self, name: &str, body: &[u8]) -> Result<(), PdfDeckError> {
        self.writer
            .start_file(name, entry_options())
            .map_err(|e| PdfDeckError::packaging(FORMAT, e))?;
        self.writer
            .write_all(body)
            .map_err(|e| PdfDeckError::packaging(FORMAT, e))
    }

    fn check_deferred(&mut self) -> Result<(), PdfDeckError> {
        match self.deferred.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Packager for SlidePackager {
    fn format(&self) -> OutputFormat {
        OutputFormat::SlideDeck
    }

    fn add_page(&mut self, page: RasterPage) -> Result<(), PdfDeckError> {
        self.check_deferred()?;
        if page.width == 0 || page.height == 0 {
            return Err(PdfDeckError::packaging(
                FORMAT,
                format!("page {} has an empty image", page.page_num()),
            ));
        }
        self.order.accept(page.index, FORMAT)?;

        let n = self.slides + 1;
        let media = format!("image{n}.png");
        let place = fit_to_width(page.width, page.height, self.width, self.height);
        let descr = format!("page_{:03}.png", page.page_num());

        self.write_bytes(&format!("ppt/media/{media}"), &page.data)?;
        self.write_part(
            &format!("ppt/slides/slide{n}.xml"),
            &parts::picture_slide(&descr, place.x, place.y, place.cx, place.cy),
        )?;
        self.write_part(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            &parts::picture_slide_rels(&media),
        )?;

        self.slides = n;
        debug!(
            "Slide {} ← page {} at y={} cx={} cy={}",
            n,
            page.page_num(),
            place.y,
            place.cx,
            place.cy
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.slides
    }

    fn finish(mut self: Box<Self>) -> Result<Vec<u8>, PdfDeckError> {
        self.check_deferred()?;
        let n = self.slides;
        let (w, h) = (self.width, self.height);
        self.write_part("ppt/presentation.xml", &parts::presentation(n, w, h))?;
        self.write_part(
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(n),
        )?;
        self.write_part("docProps/app.xml", &parts::app_props(n))?;
        self.write_part("[Content_Types].xml", &parts::content_types(n))?;

        let cursor = self
            .writer
            .finish()
            .map_err(|e| PdfDeckError::packaging(FORMAT, e))?;
        Ok(cursor.into_inner())
    }
}
