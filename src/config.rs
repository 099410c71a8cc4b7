//! Configuration types for PDF rasterisation and packaging.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The config is a plain value passed
//! into the orchestrator; nothing is read from global state.

use crate::error::PdfDeckError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for a single conversion.
///
/// # Example
/// ```rust
/// use pdfdeck::{ConversionConfig, OutputFormat, PageSelection, QualityProfile};
///
/// let config = ConversionConfig::builder()
///     .quality(QualityProfile::Print)
///     .format(OutputFormat::SlideDeck)
///     .pages(PageSelection::Range("1, 3-5".into()))
///     .build()
///     .unwrap();
/// assert_eq!(config.quality.scale_factor(), 4.0);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Resolution tier. Default: [`QualityProfile::High`].
    pub quality: QualityProfile,

    /// Archive of images or slide deck. Default: [`OutputFormat::Archive`].
    pub format: OutputFormat,

    /// Which pages to convert. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Slide dimensions used by the deck packager. Default: 4:3.
    pub slide_size: SlideSize,

    /// File name stem for [`crate::ConversionResult::file_name`].
    /// Default: `converted_result`.
    pub output_stem: String,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: QualityProfile::default(),
            format: OutputFormat::default(),
            pages: PageSelection::default(),
            password: None,
            slide_size: SlideSize::default(),
            output_stem: "converted_result".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("quality", &self.quality)
            .field("format", &self.format)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("slide_size", &self.slide_size)
            .field("output_stem", &self.output_stem)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn quality(mut self, quality: QualityProfile) -> Self {
        self.config.quality = quality;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn slide_size(mut self, size: SlideSize) -> Self {
        self.config.slide_size = size;
        self
    }

    pub fn output_stem(mut self, stem: impl Into<String>) -> Self {
        self.config.output_stem = stem.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, PdfDeckError> {
        let c = &self.config;
        let (width, height) = c.slide_size.dimensions();
        if !(SlideSize::MIN_EMU..=SlideSize::MAX_EMU).contains(&width)
            || !(SlideSize::MIN_EMU..=SlideSize::MAX_EMU).contains(&height)
        {
            return Err(PdfDeckError::InvalidConfig(format!(
                "Slide size must be {}–{} EMU per side, got {}×{}",
                SlideSize::MIN_EMU,
                SlideSize::MAX_EMU,
                width,
                height
            )));
        }
        if c.output_stem.trim().is_empty() || c.output_stem.contains(['/', '\\']) {
            return Err(PdfDeckError::InvalidConfig(format!(
                "Output stem must be a bare file name, got {:?}",
                c.output_stem
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Named resolution tier. Each tier scales both page axes by a fixed factor,
/// so a US-Letter page (612 × 792 pt) at `High` becomes 1836 × 2376 px.
///
/// | Tier | Label | Scale |
/// |------|-------|-------|
/// | `Standard` | 1080p-equivalent | 2.0 |
/// | `High` | 2K-equivalent (default) | 3.0 |
/// | `Print` | 4K-equivalent | 4.0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityProfile {
    Standard,
    #[default]
    High,
    Print,
}

impl QualityProfile {
    pub const ALL: [QualityProfile; 3] = [Self::Standard, Self::High, Self::Print];

    /// Uniform scale factor applied to both axes when rasterising.
    pub fn scale_factor(self) -> f32 {
        match self {
            Self::Standard => 2.0,
            Self::High => 3.0,
            Self::Print => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::High => "high",
            Self::Print => "print",
        }
    }
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QualityProfile {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "1080p" | "fhd" => Ok(Self::Standard),
            "high" | "2k" => Ok(Self::High),
            "print" | "4k" => Ok(Self::Print),
            other => Err(PdfDeckError::InvalidConfig(format!(
                "Unknown quality tier '{other}' (expected standard, high or print)"
            ))),
        }
    }
}

/// Output container produced by the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ZIP archive with one PNG per page.
    #[default]
    Archive,
    /// PowerPoint deck with one full-width picture per slide.
    SlideDeck,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Archive => "zip",
            Self::SlideDeck => "pptx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Archive => "application/zip",
            Self::SlideDeck => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" | "archive" | "images" => Ok(Self::Archive),
            "pptx" | "slides" | "slidedeck" | "deck" => Ok(Self::SlideDeck),
            other => Err(PdfDeckError::InvalidConfig(format!(
                "Unknown output format '{other}' (expected zip or pptx)"
            ))),
        }
    }
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default). Skips range parsing entirely.
    #[default]
    All,
    /// Free-text range expression such as `"1, 3-5"`, one-based.
    Range(String),
}

impl FromStr for PageSelection {
    type Err = std::convert::Infallible;

    /// `all` (any case) selects everything; any other text is a range
    /// expression, including the empty string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Range(s.to_string()))
        }
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Range(text) => f.write_str(text),
        }
    }
}

/// Slide dimensions in EMU (914 400 EMU = 1 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideSize {
    /// 10 × 7.5 in, the blank-template default.
    #[default]
    Standard4x3,
    /// 13.333 × 7.5 in.
    Widescreen16x9,
    Custom { width: u64, height: u64 },
}

impl SlideSize {
    /// Smallest side PowerPoint accepts (1 in).
    pub const MIN_EMU: u64 = 914_400;
    /// Largest side PowerPoint accepts (56 in).
    pub const MAX_EMU: u64 = 51_206_400;

    /// `(width, height)` in EMU.
    pub fn dimensions(self) -> (u64, u64) {
        match self {
            Self::Standard4x3 => (9_144_000, 6_858_000),
            Self::Widescreen16x9 => (12_192_000, 6_858_000),
            Self::Custom { width, height } => (width, height),
        }
    }
}

impl FromStr for SlideSize {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4:3" | "standard" => Ok(Self::Standard4x3),
            "16:9" | "widescreen" => Ok(Self::Widescreen16x9),
            other => Err(PdfDeckError::InvalidConfig(format!(
                "Unknown slide size '{other}' (expected 4:3 or 16:9)"
            ))),
        }
    }
}
