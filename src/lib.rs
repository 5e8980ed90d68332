//! # bookmarks2pdf
//!
//! Archive recently-added Chrome bookmarks as timestamped PDF snapshots,
//! with a browsable HTML index of the whole collection.
//!
//! ## Why this crate?
//!
//! Bookmarks rot: pages move, paywalls appear, sites disappear. This crate
//! reads Chrome's own `Bookmarks` export, finds everything added in the last
//! seven days that a previous run hasn't handled, and captures each page as
//! a PDF via a headless browser — so the archive grows incrementally with no
//! duplicate work and no external service.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Bookmarks (JSON)
//!  │
//!  ├─ 1. Backup  verbatim copy into the output directory
//!  ├─ 2. Parse   roots.{bookmark_bar, other, synced} → tagged node tree
//!  ├─ 3. Filter  depth-first walk: added within the window AND after the
//!  │             last-run watermark
//!  ├─ 4. Render  one headless-browser PDF per candidate, sequentially
//!  ├─ 5. Index   regenerate Bookmarks.html over the whole tree, newest first
//!  └─ 6. Commit  advance last_run.txt (only when every snapshot succeeded)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookmarks2pdf::{archive, ArchiveConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Paths default to the current user's Chrome profile and
//!     // ~/Documents/bookmarkstorage/.
//!     let config = ArchiveConfig::default();
//!     let report = archive(&config).await?;
//!     println!(
//!         "{}/{} archived, index at {}",
//!         report.stats.archived,
//!         report.stats.candidates,
//!         report.index_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bm2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! bookmarks2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod archive;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::{archive, archive_sync, inspect};
pub use config::{ArchiveConfig, ArchiveConfigBuilder};
pub use error::{ArchiveError, SnapshotError};
pub use output::{RunReport, RunStats, SnapshotResult, StoreSummary};
pub use pipeline::render::{HeadlessChromeRenderer, UrlRenderer};
pub use progress::{ArchiveProgressCallback, NoopProgressCallback, ProgressCallback};
