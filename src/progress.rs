//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline renders each page. The CLI uses it to drive a
//! terminal progress bar; a web front-end could forward it to a status line.
//!
//! # Example
//!
//! ```rust
//! use pdfdeck::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, image_bytes: usize) {
//!         let done = self.rendered.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}/{total_pages}: page {page_num} ({image_bytes} bytes)");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { rendered: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// Implementations must be `Send + Sync` because the async entry points
/// run the pipeline on a blocking worker thread. All methods default to
/// no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the page selection is resolved, before rendering.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will be rendered
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is rasterised.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number in the source document
    /// * `total_pages`: number of selected pages
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page has been rendered and handed to the packager.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: number of selected pages
    /// * `image_bytes`: size of the encoded PNG
    fn on_page_complete(&self, page_num: usize, total_pages: usize, image_bytes: usize) {
        let _ = (page_num, total_pages, image_bytes);
    }

    /// Called once after the container has been finalised.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages packaged
    /// * `output_bytes`: size of the finished archive or deck
    fn on_conversion_complete(&self, total_pages: usize, output_bytes: usize) {
        let _ = (total_pages, output_bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        bytes: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, image_bytes: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            self.bytes.fetch_add(image_bytes, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_conversion_complete(5, 4096);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2, 100);
        tracker.on_page_start(3, 2);
        tracker.on_page_complete(3, 2, 250);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.bytes.load(Ordering::SeqCst), 350);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_complete(1, 10, 512);
    }
}
