//! CLI binary for pdfdeck.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and writes the resulting container.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfdeck::{
    convert_to_file, inspect, ConversionConfig, ConversionProgressCallback, ConversionStats,
    OutputFormat, PageSelection, ProgressCallback, QualityProfile, SlideSize,
};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-page wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    /// Spinner until `on_conversion_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }

    fn take_elapsed_ms(&self, page_num: usize) -> u128 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&page_num))
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0)
    }

    /// Stop the spinner and wipe the bar so an error prints on a clean line.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rendering {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(page_num, Instant::now());
        }
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, _total: usize, image_bytes: usize) {
        let elapsed_ms = self.take_elapsed_ms(page_num);
        self.bar.println(format!(
            "  {} Page {:>3}  {:<12}  {}",
            green("✓"),
            page_num,
            dim(&format!("{:>6} KiB", image_bytes / 1024)),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, output_bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages packaged ({} KiB)",
            green("✔"),
            bold(&total_pages.to_string()),
            output_bytes / 1024
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page as PNGs in converted_result.zip
  pdfdeck document.pdf

  # Pages 1 and 3 to 5 as a slide deck
  pdfdeck document.pdf --pages "1, 3-5" --format pptx

  # Print quality, widescreen slides, custom output path
  pdfdeck slides.pdf --quality print --format pptx --slide-size 16:9 -o deck.pptx

  # Inspect PDF metadata
  pdfdeck --inspect-only document.pdf

  # Machine-readable stats
  pdfdeck --json document.pdf -o pages.zip

PAGE RANGES:
  Comma-separated one-based pages and inclusive ranges, e.g. "1, 3-5, 9".
  Ranges are clamped to the document; malformed parts are ignored; an
  empty value or "all" selects every page.

QUALITY TIERS:
  standard   2x scale   roughly 1080p
  high       3x scale   roughly 2K (default)
  print      4x scale   roughly 4K

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or containing directory)
  RUST_LOG          Override the log filter (e.g. pdfdeck=debug)
"#;

/// Convert PDF pages to a ZIP of PNGs or a PowerPoint deck.
#[derive(Parser, Debug)]
#[command(
    name = "pdfdeck",
    version,
    about = "Convert PDF pages to a ZIP of PNG images or a PowerPoint deck",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Output file. Default: converted_result.zip or converted_result.pptx.
    #[arg(short, long, env = "PDFDECK_OUTPUT")]
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3-5,9.
    #[arg(long, env = "PDFDECK_PAGES", default_value = "all")]
    pages: String,

    /// Output quality tier.
    #[arg(long, env = "PDFDECK_QUALITY", value_enum, default_value = "high")]
    quality: QualityArg,

    /// Output container.
    #[arg(long, env = "PDFDECK_FORMAT", value_enum, default_value = "zip")]
    format: FormatArg,

    /// Slide aspect ratio (pptx only).
    #[arg(long, env = "PDFDECK_SLIDE_SIZE", value_enum, default_value = "4:3")]
    slide_size: SlideSizeArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFDECK_PASSWORD")]
    password: Option<String>,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Print stats (or metadata with --inspect-only) as JSON on stdout.
    #[arg(long, env = "PDFDECK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFDECK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFDECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFDECK_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum QualityArg {
    Standard,
    High,
    Print,
}

impl From<QualityArg> for QualityProfile {
    fn from(v: QualityArg) -> Self {
        match v {
            QualityArg::Standard => QualityProfile::Standard,
            QualityArg::High => QualityProfile::High,
            QualityArg::Print => QualityProfile::Print,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Zip,
    Pptx,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Zip => OutputFormat::Archive,
            FormatArg::Pptx => OutputFormat::SlideDeck,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SlideSizeArg {
    #[value(name = "4:3")]
    Standard,
    #[value(name = "16:9")]
    Widescreen,
}

impl From<SlideSizeArg> for SlideSize {
    fn from(v: SlideSizeArg) -> Self {
        match v {
            SlideSizeArg::Standard => SlideSize::Standard4x3,
            SlideSizeArg::Widescreen => SlideSize::Widescreen16x9,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; verbose always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new_dynamic);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn ConversionProgressCallback>);

    let config = build_config(&cli, progress_cb)?;
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&config));

    // ── Run conversion ───────────────────────────────────────────────────
    let stats = match convert_to_file(&cli.input, &output_path, &config).await {
        Ok(stats) => stats,
        Err(e) => {
            if let Some(cb) = &cli_progress {
                cb.abandon();
            }
            return Err(e).context("Conversion failed");
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        print_summary(&stats, &output_path);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages: PageSelection = cli.pages.parse().unwrap_or_default();

    let mut builder = ConversionConfig::builder()
        .quality(cli.quality.into())
        .format(cli.format.into())
        .pages(pages)
        .slide_size(cli.slide_size.into());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `converted_result.<ext>` in the working directory.
fn default_output(config: &ConversionConfig) -> PathBuf {
    PathBuf::from(format!(
        "{}.{}",
        config.output_stem,
        config.format.extension()
    ))
}

fn print_summary(stats: &ConversionStats, output_path: &std::path::Path) {
    eprintln!(
        "{}  {}/{} pages  {}  {}ms  →  {}",
        green("✔"),
        stats.converted_pages,
        stats.total_pages,
        stats.quality,
        stats.total_duration_ms,
        bold(&output_path.display().to_string()),
    );
    eprintln!(
        "   {} render  /  {} package  /  {} KiB",
        dim(&format!("{}ms", stats.render_duration_ms)),
        dim(&format!("{}ms", stats.package_duration_ms)),
        stats.output_bytes / 1024,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abandon_clears_a_running_bar() {
        let cb = CliProgressCallback::new_dynamic();
        cb.on_conversion_start(3);
        cb.on_page_start(1, 3);
        assert!(!cb.bar.is_finished());

        cb.abandon();
        assert!(cb.bar.is_finished());
    }

    #[test]
    fn password_reaches_the_config() {
        let cli = Cli::parse_from(["pdfdeck", "in.pdf", "--password", "pw", "--inspect-only"]);
        assert_eq!(cli.password.as_deref(), Some("pw"));

        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.password.as_deref(), Some("pw"));
    }

    #[test]
    fn default_output_follows_the_format() {
        let cli = Cli::parse_from(["pdfdeck", "in.pdf", "--format", "pptx"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(default_output(&config), PathBuf::from("converted_result.pptx"));

        let cli = Cli::parse_from(["pdfdeck", "in.pdf"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(default_output(&config), PathBuf::from("converted_result.zip"));
    }
}
