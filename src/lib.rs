//! # pdfdeck
//!
//! Convert PDF documents into page images: a ZIP of PNGs, or a PPTX deck
//! with one full-width picture per slide.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    read the file, check the %PDF magic
//!  ├─ 2. Select   page-range expression → sorted, unique page indices
//!  ├─ 3. Render   rasterise each selected page via pdfium at the tier's scale
//!  ├─ 4. Encode   flatten to RGB, PNG
//!  └─ 5. Package  stream pages into a .zip or .pptx
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfdeck::{convert, ConversionConfig, OutputFormat, PageSelection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .format(OutputFormat::SlideDeck)
//!         .pages(PageSelection::Range("1, 3-5".into()))
//!         .build()?;
//!     let result = convert("document.pdf", &config).await?;
//!     std::fs::write(result.file_name(), &result.bytes)?;
//!     eprintln!("{} slides", result.stats.converted_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Quality Tiers
//!
//! | Tier | Scale | Roughly |
//! |------|-------|---------|
//! | [`QualityProfile::Standard`] | 2× | 1080p |
//! | [`QualityProfile::High`] (default) | 3× | 2K |
//! | [`QualityProfile::Print`] | 4× | 4K |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfdeck` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfdeck = { version = "0.1", default-features = false }
//! ```
//!
//! ## Runtime Requirements
//!
//! pdfium is loaded at run time; see [`pipeline::engine::bind_pdfium`] for
//! the lookup order. Everything except rendering (page selection,
//! packaging) works without it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod progress;
pub mod range;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, OutputFormat, PageSelection, QualityProfile,
    SlideSize,
};
pub use convert::{
    convert, convert_bytes, convert_document, convert_sync, convert_to_file, inspect,
    inspect_bytes,
};
pub use error::{ErrorCategory, PdfDeckError};
pub use output::{ConversionRequest, ConversionResult, ConversionStats, DocumentInfo, RasterPage};
pub use package::{ArchivePackager, Packager, SlidePackager};
pub use pipeline::engine::PageSource;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use range::{parse_page_range, PageIndexSet};
