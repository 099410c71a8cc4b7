//! Pipeline stages that turn PDF bytes into raster pages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──▶ render ──▶ encode ──▶ crate::package
//! (path)    (pdfium)   (scale)    (PNG)      (zip / pptx)
//! ```
//!
//! 1. [`input`]: read a local file and check the `%PDF` magic
//! 2. [`engine`]: bind pdfium and expose the open document as a
//!    [`engine::PageSource`]
//! 3. [`render`]: [`render::Rasterizer`], one page at one scale
//! 4. [`encode`]: flatten to RGB and PNG-encode

pub mod encode;
pub mod engine;
pub mod input;
pub mod render;
