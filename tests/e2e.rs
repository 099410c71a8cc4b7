//! End-to-end tests through a real pdfium library.
//!
//! Gated behind the `E2E_ENABLED` environment variable so they do not run in
//! CI unless a pdfium binary is available. Sample documents are generated
//! with pdfium itself; files in `./test_cases/` are used when present.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/lib cargo test --test e2e -- --test-threads=1 --nocapture
//!
//! pdfium is bound per call, so run single-threaded.

use pdfdeck::pipeline::engine::bind_pdfium;
use pdfdeck::{
    convert, convert_bytes, convert_to_file, inspect, inspect_bytes, ConversionConfig,
    OutputFormat, PageSelection, PdfDeckError, QualityProfile,
};
use pdfium_render::prelude::*;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use zip::ZipArchive;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

/// A blank A4 document with `pages` pages.
fn blank_pdf(pages: usize) -> Vec<u8> {
    let pdfium = bind_pdfium().expect("pdfium should bind when E2E_ENABLED is set");
    let mut document = pdfium.create_new_pdf().expect("create document");
    for _ in 0..pages {
        document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::a4())
            .expect("add page");
    }
    document.save_to_bytes().expect("save document")
}

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip");
    archive.file_names().map(str::to_string).collect()
}

// ── Inspect ──────────────────────────────────────────────────────────────────

#[test]
fn test_inspect_generated_document() {
    e2e_skip_unless_enabled!();
    let info = inspect_bytes(&blank_pdf(3), None).unwrap();
    assert_eq!(info.page_count, 3);
    assert!(!info.pdf_version.is_empty());
}

#[tokio::test]
async fn test_inspect_nonexistent() {
    let err = inspect("/nonexistent/path/file.pdf", None).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::FileNotFound { .. }), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_inspect_file_with_password() {
    e2e_skip_unless_enabled!();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.pdf");
    std::fs::write(&path, blank_pdf(2)).unwrap();

    // pdfium ignores a password on an unencrypted document
    let info = inspect(&path, Some("secret")).await.unwrap();
    assert_eq!(info.page_count, 2);
}

/// `test_cases/encrypted.pdf` with user password `test`, when present.
#[tokio::test(flavor = "multi_thread")]
async fn test_inspect_encrypted_sample() {
    e2e_skip_unless_enabled!();
    let path = test_cases_dir().join("encrypted.pdf");
    if !path.exists() {
        println!("SKIP — no test_cases/encrypted.pdf");
        return;
    }

    let err = inspect(&path, None).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::PasswordRequired), "{err}");
    let err = inspect(&path, Some("wrong")).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::WrongPassword), "{err}");
    let info = inspect(&path, Some("test")).await.unwrap();
    assert!(info.page_count > 0);
}

// ── Convert ──────────────────────────────────────────────────────────────────

#[test]
fn test_archive_from_generated_document() {
    e2e_skip_unless_enabled!();
    let config = ConversionConfig::builder()
        .quality(QualityProfile::Standard)
        .pages(PageSelection::Range("1, 3-5".into()))
        .build()
        .unwrap();
    let result = convert_bytes(&blank_pdf(10), &config).unwrap();

    assert_eq!(
        entry_names(&result.bytes),
        vec!["page_001.png", "page_003.png", "page_004.png", "page_005.png"]
    );

    let mut archive = ZipArchive::new(Cursor::new(result.bytes)).unwrap();
    let mut png = Vec::new();
    archive
        .by_name("page_001.png")
        .unwrap()
        .read_to_end(&mut png)
        .unwrap();
    let img = image::load_from_memory(&png).unwrap();
    // A4 is 595 x 842 pt; 2x gives roughly 1190 x 1684 px
    assert!((1185..=1195).contains(&img.width()), "width {}", img.width());
    assert!((1680..=1690).contains(&img.height()), "height {}", img.height());
}

#[test]
fn test_out_of_range_selection_on_real_document() {
    e2e_skip_unless_enabled!();
    let config = ConversionConfig::builder()
        .pages(PageSelection::Range("9".into()))
        .build()
        .unwrap();
    let err = convert_bytes(&blank_pdf(5), &config).unwrap_err();
    assert!(matches!(err, PdfDeckError::InvalidPageSelection { total: 5, .. }));
}

#[test]
fn test_deck_from_generated_document() {
    e2e_skip_unless_enabled!();
    let config = ConversionConfig::builder()
        .quality(QualityProfile::Standard)
        .format(OutputFormat::SlideDeck)
        .build()
        .unwrap();
    let result = convert_bytes(&blank_pdf(2), &config).unwrap();
    let names = entry_names(&result.bytes);
    assert!(names.iter().any(|n| n == "ppt/slides/slide2.xml"));
    assert!(!names.iter().any(|n| n == "ppt/slides/slide3.xml"));
}

#[test]
fn test_rendering_is_deterministic() {
    e2e_skip_unless_enabled!();
    let pdf = blank_pdf(2);
    let config = ConversionConfig::builder()
        .quality(QualityProfile::Standard)
        .build()
        .unwrap();
    let a = convert_bytes(&pdf, &config).unwrap();
    let b = convert_bytes(&pdf, &config).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn test_garbage_after_magic_is_corrupt() {
    e2e_skip_unless_enabled!();
    let err = convert_bytes(b"%PDF-1.7\nthis is not a pdf", &ConversionConfig::default())
        .unwrap_err();
    assert!(matches!(err, PdfDeckError::CorruptPdf { .. }), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_convert_to_file_round_trip() {
    e2e_skip_unless_enabled!();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    std::fs::write(&input, blank_pdf(3)).unwrap();
    let output = dir.path().join("out").join("converted_result.zip");

    // "2-" is malformed: the only token is skipped and nothing is selected
    let config = ConversionConfig::builder()
        .quality(QualityProfile::Standard)
        .pages(PageSelection::Range("2-".into()))
        .build()
        .unwrap();
    let err = convert_to_file(&input, &output, &config).await.unwrap_err();
    assert!(matches!(err, PdfDeckError::InvalidPageSelection { .. }));
    assert!(!output.exists());

    let config = ConversionConfig::builder()
        .quality(QualityProfile::Standard)
        .pages(PageSelection::Range("2-3".into()))
        .build()
        .unwrap();
    let stats = convert_to_file(&input, &output, &config).await.unwrap();
    assert_eq!(stats.converted_pages, 2);
    assert_eq!(entry_names(&std::fs::read(&output).unwrap()).len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sample_files_in_test_cases() {
    e2e_skip_unless_enabled!();
    let Ok(entries) = std::fs::read_dir(test_cases_dir()) else {
        println!("SKIP — no test_cases/ directory");
        return;
    };
    let config = ConversionConfig::builder()
        .quality(QualityProfile::Standard)
        .pages(PageSelection::Range("1".into()))
        .format(OutputFormat::SlideDeck)
        .build()
        .unwrap();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
            continue;
        }
        let result = convert(&path, &config)
            .await
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert_eq!(result.stats.converted_pages, 1, "{}", path.display());
    }
}
