//! CLI binary for bookmarks2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ArchiveConfig` and prints results.

use anyhow::{Context, Result};
use bookmarks2pdf::{
    archive, inspect, ArchiveConfig, ArchiveProgressCallback, ProgressCallback,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live bar and per-bookmark log lines.
/// Snapshots are strictly sequential, so no out-of-order handling is needed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_run_start` once the
    /// candidate count is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading bookmarks…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} bookmarks  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Archiving");
    }
}

impl ArchiveProgressCallback for CliProgressCallback {
    fn on_run_start(&self, candidates: usize) {
        self.activate_bar(candidates);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Archiving {candidates} bookmark(s)…"))
        ));
    }

    fn on_snapshot_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_snapshot_complete(&self, index: usize, total: usize, name: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}",
            green("✓"),
            index,
            total,
            name
        ));
        self.bar.inc(1);
    }

    fn on_snapshot_error(&self, index: usize, total: usize, name: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = truncated(error, 80);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total: usize, archived: usize) {
        let failed = total.saturating_sub(archived);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} bookmark(s) archived",
                green("✔"),
                bold(&archived.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} archived  ({} failed, will retry next run)",
                if archived == 0 { red("✘") } else { cyan("⚠") },
                bold(&archived.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

/// Cap a message at `max` characters, appending an ellipsis when cut.
///
/// Error text interpolates bookmark URLs, which are not guaranteed ASCII;
/// counting chars instead of bytes keeps the cut off a char boundary.
fn truncated(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}\u{2026}")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Archive this week's additions from the default Chrome profile
  bm2pdf

  # A different profile and output directory
  bm2pdf --bookmarks ~/.config/chromium/Default/Bookmarks -o ~/archive

  # Wider window (first run on a fresh output directory)
  bm2pdf --window-days 30

  # Regenerate the HTML index only, no browser needed
  bm2pdf --index-only

  # Show what the store contains, archive nothing
  bm2pdf --inspect-only --json

FILES (inside the output directory):
  <name>.pdf            one snapshot per archived bookmark ('/' → '-')
  Bookmarks.html        full index, newest first, regenerated every run
  BookmarksBackup.json  verbatim copy of the source export
  last_run.txt          watermark of the last fully-successful run (UTC)

NOTES:
  A bookmark is archived when it was added within the window AND after the
  watermark. Failed snapshots leave the watermark untouched, so they are
  picked up again on the next run. Rendering needs a Chromium/Chrome binary
  on PATH (or pass --browser)."#;

/// Archive recently-added Chrome bookmarks as PDF snapshots.
#[derive(Parser, Debug)]
#[command(
    name = "bm2pdf",
    version,
    about = "Archive recently-added Chrome bookmarks as PDF snapshots",
    long_about = "Read Chrome's Bookmarks export, capture every bookmark added since the last \
run (and within the trailing window) as a PDF via headless Chrome, and regenerate a browsable \
HTML index of the whole collection.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to Chrome's Bookmarks file (default: the OS profile location).
    #[arg(long, env = "BM2PDF_BOOKMARKS")]
    bookmarks: Option<PathBuf>,

    /// Output directory for PDFs, index, backup, and watermark
    /// (default: ~/Documents/bookmarkstorage).
    #[arg(short, long, env = "BM2PDF_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Trailing window in days a bookmark must fall inside.
    #[arg(long, env = "BM2PDF_WINDOW_DAYS", default_value_t = 7,
          value_parser = clap::value_parser!(i64).range(1..))]
    window_days: i64,

    /// Browser binary to use instead of probing PATH.
    #[arg(long, env = "BM2PDF_BROWSER")]
    browser: Option<String>,

    /// Per-snapshot render timeout in seconds.
    #[arg(long, env = "BM2PDF_RENDER_TIMEOUT", default_value_t = 120)]
    render_timeout: u64,

    /// Regenerate the HTML index only; render nothing.
    #[arg(long)]
    index_only: bool,

    /// Print a summary of the bookmark store, archive nothing.
    #[arg(long)]
    inspect_only: bool,

    /// Output structured JSON (RunReport / StoreSummary) instead of text.
    #[arg(long, env = "BM2PDF_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "BM2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BM2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BM2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
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
        let config = build_config(&cli, None)?;
        let home = config.resolve_home().context("Failed to resolve paths")?;
        let path = config.resolve_bookmarks_path(&home);
        let summary = inspect(&path).await.context("Failed to inspect bookmarks")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
            );
        } else {
            println!("File:       {}", path.display());
            println!("Bookmarks:  {}", summary.total_bookmarks);
            for (root, count) in &summary.roots {
                println!("  {root:<14} {count}");
            }
            if let Some(newest) = summary.newest {
                println!("Newest:     {}", newest.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        return Ok(());
    }

    // ── Index-only mode: refresh Bookmarks.html, render nothing ──────────
    if cli.index_only {
        let config = build_config(&cli, None)?;
        let home = config.resolve_home().context("Failed to resolve paths")?;
        let path = config.resolve_bookmarks_path(&home);
        let output_dir = config.resolve_output_dir(&home);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let file = bookmarks2pdf::pipeline::store::load_bookmarks(&path)
            .await
            .context("Failed to load bookmarks")?;
        let flat = bookmarks2pdf::pipeline::walk::flatten(&file.roots.all_children())
            .context("Failed to flatten bookmarks")?;
        let html = bookmarks2pdf::pipeline::index::generate_index(&flat);
        let index_path = bookmarks2pdf::pipeline::index::write_index(&output_dir, &html)
            .await
            .context("Failed to write index")?;

        if cli.json {
            println!("{}", index_summary_json(flat.len(), &index_path));
        } else if !cli.quiet {
            eprintln!(
                "{} {} bookmarks indexed  →  {}",
                green("✔"),
                bold(&flat.len().to_string()),
                bold(&index_path.display().to_string()),
            );
        }
        return Ok(());
    }

    // ── Build config and run ─────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ArchiveProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;
    let report = archive(&config).await.context("Archiving failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
        return Ok(());
    }

    // Summary line (the callback already printed the per-bookmark log).
    if !cli.quiet {
        if !show_progress {
            eprintln!(
                "Archived {}/{} bookmark(s) in {}ms",
                report.stats.archived, report.stats.candidates, report.stats.total_duration_ms
            );
            for failure in report.failures() {
                if let Some(ref e) = failure.error {
                    eprintln!("  failed: {}: {}", failure.name, e);
                }
            }
        }
        eprintln!(
            "   {} bookmarks indexed  →  {}",
            dim(&report.stats.total_bookmarks.to_string()),
            bold(&report.index_path.display().to_string()),
        );
        if !report.watermark_advanced {
            eprintln!("   {}", dim("watermark not advanced (failures above)"));
        }
    }

    Ok(())
}

/// The `--index-only --json` payload: what was indexed and where.
fn index_summary_json(total_bookmarks: usize, index_path: &std::path::Path) -> String {
    serde_json::json!({
        "total_bookmarks": total_bookmarks,
        "index_path": index_path,
    })
    .to_string()
}

/// Map CLI args to `ArchiveConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ArchiveConfig> {
    let mut builder = ArchiveConfig::builder()
        .window_days(cli.window_days)
        .render_timeout_secs(cli.render_timeout);

    if let Some(ref path) = cli.bookmarks {
        builder = builder.bookmarks_path(path);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref browser) = cli.browser {
        builder = builder.browser(browser);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_pass_through_untruncated() {
        assert_eq!(truncated("browser crashed", 80), "browser crashed");
    }

    #[test]
    fn long_messages_are_capped_with_ellipsis() {
        let long = "x".repeat(120);
        let msg = truncated(&long, 80);
        assert_eq!(msg.chars().count(), 80);
        assert!(msg.ends_with('\u{2026}'));
    }

    #[test]
    fn truncation_survives_a_multibyte_char_at_the_cut() {
        // 78 ASCII bytes then a two-byte char straddling the old cut point.
        let mut long = "x".repeat(78);
        long.push('é');
        long.push_str(" Rendering 'http://exämple.com/ü' timed out");
        let msg = truncated(&long, 80);
        assert_eq!(msg.chars().count(), 80);
        assert!(msg.ends_with('\u{2026}'));
    }

    #[test]
    fn error_callback_tolerates_multibyte_error_text() {
        let mut err = "x".repeat(78);
        err.push('é');
        err.push_str(" timed out after 120s");
        let cb = CliProgressCallback::new_dynamic();
        cb.on_run_start(1);
        cb.on_snapshot_error(1, 1, "name", &err);
    }

    #[test]
    fn index_summary_json_carries_count_and_path() {
        let json = index_summary_json(42, std::path::Path::new("/out/Bookmarks.html"));
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["total_bookmarks"], 42);
        assert_eq!(v["index_path"], "/out/Bookmarks.html");
    }
}
