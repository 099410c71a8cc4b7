//! Conversion entry points.
//!
//! Every path funnels into [`convert_document`], which works against any
//! [`PageSource`]: resolve the page selection, render each selected page in
//! ascending order, stream it into the packager, finish the container.
//! Nothing is retried and the first error aborts the whole request, so a
//! result always contains exactly the selected pages.
//!
//! The async functions run pdfium on a blocking worker via
//! [`tokio::task::spawn_blocking`]; the `_sync` and `_bytes` variants stay
//! on the calling thread.

use crate::config::ConversionConfig;
use crate::error::PdfDeckError;
use crate::output::{ConversionRequest, ConversionResult, ConversionStats, DocumentInfo};
use crate::package::packager_for;
use crate::pipeline::engine::{bind_pdfium, PageSource, PdfiumDocument};
use crate::pipeline::input;
use crate::pipeline::render::Rasterizer;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file.
///
/// # Errors
/// Any [`PdfDeckError`]; see [`convert_document`] for the conversion
/// failures and [`input::read_pdf`] for the file ones.
pub async fn convert(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionResult, PdfDeckError> {
    let path = path.as_ref();
    info!("Starting conversion: {}", path.display());
    let bytes = input::read_pdf(path).await?;

    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_bytes(&bytes, &config))
        .await
        .map_err(|e| PdfDeckError::Internal(format!("conversion task failed: {e}")))?
}

/// Blocking twin of [`convert`]. Does not need a tokio runtime.
pub fn convert_sync(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionResult, PdfDeckError> {
    let path = path.as_ref();
    info!("Starting conversion: {}", path.display());
    let bytes = input::read_pdf_blocking(path)?;
    convert_bytes(&bytes, config)
}

/// Convert a PDF held in memory.
///
/// Binds pdfium, opens the document for the duration of the call and closes
/// it on every exit path.
pub fn convert_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionResult, PdfDeckError> {
    input::check_magic(bytes, Path::new(input::MEMORY_INPUT))?;
    let pdfium = bind_pdfium()?;
    let document = PdfiumDocument::open(&pdfium, bytes, config.password.as_deref())?;
    convert_document(&document, config)
}

/// Convert an already-open document.
///
/// # Errors
/// - [`PdfDeckError::InvalidPageSelection`] when the selection matches no
///   page; nothing is rendered in that case.
/// - [`PdfDeckError::RasterisationFailed`] for the first page that fails.
/// - [`PdfDeckError::PackagingFailed`] if the container cannot be written.
pub fn convert_document<S: PageSource + ?Sized>(
    source: &S,
    config: &ConversionConfig,
) -> Result<ConversionResult, PdfDeckError> {
    let total_start = Instant::now();
    let request = ConversionRequest::resolve(config, source.page_count())?;
    let selected = request.pages.len();
    info!(
        "Converting {} of {} pages at {} (x{}) to {}",
        selected,
        request.total_pages,
        request.quality,
        request.quality.scale_factor(),
        request.format.extension()
    );

    let callback = config.progress_callback.as_deref();
    if let Some(cb) = callback {
        cb.on_conversion_start(selected);
    }

    let rasterizer = Rasterizer::new(source, request.quality);
    let mut packager = packager_for(request.format, config.slide_size);
    let mut render_ms = 0u64;
    let mut package_ms = 0u64;

    for index in &request.pages {
        let page_num = index + 1;
        if let Some(cb) = callback {
            cb.on_page_start(page_num, selected);
        }

        let start = Instant::now();
        let page = rasterizer.render(index)?;
        render_ms += start.elapsed().as_millis() as u64;
        let image_bytes = page.data.len();

        let start = Instant::now();
        packager.add_page(page)?;
        package_ms += start.elapsed().as_millis() as u64;

        if let Some(cb) = callback {
            cb.on_page_complete(page_num, selected, image_bytes);
        }
    }

    let converted_pages = packager.page_count();
    let start = Instant::now();
    let bytes = packager.finish()?;
    package_ms += start.elapsed().as_millis() as u64;

    let stats = ConversionStats {
        total_pages: request.total_pages,
        converted_pages,
        quality: request.quality,
        format: request.format,
        render_duration_ms: render_ms,
        package_duration_ms: package_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        output_bytes: bytes.len(),
    };

    info!(
        "Conversion complete: {} pages, {} bytes, {}ms total",
        converted_pages, stats.output_bytes, stats.total_duration_ms
    );
    if let Some(cb) = callback {
        cb.on_conversion_complete(selected, bytes.len());
    }

    Ok(ConversionResult {
        bytes,
        extension: request.format.extension(),
        content_type: request.format.content_type(),
        stem: config.output_stem.clone(),
        stats,
    })
}

/// Convert a PDF and write the container to `output_path`.
///
/// Uses atomic write (temp file in the target directory, then rename), so
/// a failed conversion never leaves a partial file behind.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, PdfDeckError> {
    let result = convert(input_path, config).await?;
    let path = output_path.as_ref().to_path_buf();

    let stats = result.stats;
    let bytes = result.bytes;
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| PdfDeckError::Internal(format!("write task failed: {e}")))??;
    Ok(stats)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PdfDeckError> {
    let write_err = |source: std::io::Error| PdfDeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Read document properties without rendering anything.
///
/// `password` opens encrypted documents, as in [`ConversionConfig::password`].
pub async fn inspect(
    path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentInfo, PdfDeckError> {
    let bytes = input::read_pdf(path.as_ref()).await?;
    let password = password.map(str::to_owned);
    tokio::task::spawn_blocking(move || inspect_bytes(&bytes, password.as_deref()))
        .await
        .map_err(|e| PdfDeckError::Internal(format!("inspect task failed: {e}")))?
}

/// Read document properties from memory.
pub fn inspect_bytes(bytes: &[u8], password: Option<&str>) -> Result<DocumentInfo, PdfDeckError> {
    input::check_magic(bytes, Path::new(input::MEMORY_INPUT))?;
    let pdfium = bind_pdfium()?;
    let document = PdfiumDocument::open(&pdfium, bytes, password)?;
    Ok(document.info())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.zip");
        write_atomic(&target, b"payload").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");

        let siblings: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(siblings.len(), 1);
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pptx");
        std::fs::write(&target, b"old").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn bytes_that_are_not_pdf_fail_before_binding() {
        let err = convert_bytes(b"GIF89a...", &ConversionConfig::default()).unwrap_err();
        assert!(matches!(err, PdfDeckError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn missing_input_is_reported() {
        let err = convert("/no/such/file.pdf", &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PdfDeckError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn inspect_with_password_checks_the_file_first() {
        let err = inspect("/no/such/file.pdf", Some("secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, PdfDeckError::FileNotFound { .. }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"GIF89a...").unwrap();
        let err = inspect(&path, Some("secret")).await.unwrap_err();
        assert!(matches!(err, PdfDeckError::NotAPdf { .. }), "{err}");
    }
}
