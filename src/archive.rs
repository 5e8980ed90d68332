//! Archiving entry points: the orchestrator wiring every pipeline stage.
//!
//! One run is a fixed sequence: snapshot the clock, resolve paths, back up
//! the source, load and parse the tree, read the watermark, filter, render
//! each candidate one at a time, regenerate the index over the whole tree,
//! and finally advance the watermark. Nothing is retried and nothing runs
//! concurrently; the pipeline's safety comes from ordering (the watermark is
//! written last) rather than from coordination.

use crate::config::ArchiveConfig;
use crate::error::ArchiveError;
use crate::output::{RunReport, RunStats, SnapshotResult, StoreSummary};
use crate::pipeline::render::{snapshot_path, HeadlessChromeRenderer, UrlRenderer};
use crate::pipeline::walk::Candidate;
use crate::pipeline::{index, store, walk};
use crate::state;
use chrono::{Duration, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Archive recently-added bookmarks and regenerate the HTML index.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(RunReport)` on success, even if some snapshots failed (check
/// `report.stats.failed`; the watermark is not advanced in that case).
///
/// # Errors
/// Returns `Err(ArchiveError)` only for fatal errors:
/// - Bookmark file missing or unparseable
/// - Output directory, backup, index, or watermark not writable
/// - Corrupt watermark file
pub async fn archive(config: &ArchiveConfig) -> Result<RunReport, ArchiveError> {
    let total_start = Instant::now();

    // ── Step 1: Snapshot the clock ───────────────────────────────────────
    // One reference time for the whole run: the window filter and the
    // watermark written at the end must agree, or a bookmark added while
    // the run is in flight could fall between them.
    let now = config.now.unwrap_or_else(Utc::now);

    // ── Step 2: Resolve paths ────────────────────────────────────────────
    let home = config.resolve_home()?;
    let bookmarks_path = config.resolve_bookmarks_path(&home);
    let output_dir = config.resolve_output_dir(&home);
    info!(
        "Archiving {} → {}",
        bookmarks_path.display(),
        output_dir.display()
    );

    // ── Step 3: Load the tree ────────────────────────────────────────────
    // Parsed before anything is written: an unreadable or corrupt source
    // must abort with no output produced, not after a backup of garbage.
    let file = store::load_bookmarks(&bookmarks_path).await?;

    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| ArchiveError::OutputDirFailed {
            path: output_dir.clone(),
            source: e,
        })?;

    // ── Step 4: Backup the source verbatim, read the watermark ───────────
    let backup_path = store::backup_bookmarks(&bookmarks_path, &output_dir).await?;
    let last_run = state::read_last_run(&output_dir).await?;
    debug!("Watermark: {last_run}");

    // ── Step 5: Filter candidates ────────────────────────────────────────
    let all_children = file.roots.all_children();
    let mut candidates = Vec::new();
    walk::collect_candidates(
        &all_children,
        now,
        last_run,
        Duration::days(config.window_days),
        &mut candidates,
    )?;
    info!("{} candidate(s) to archive", candidates.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(candidates.len());
    }

    // ── Step 6: Render, one candidate at a time ──────────────────────────
    let renderer = resolve_renderer(config);
    let render_start = Instant::now();
    let results = snapshot_all(&renderer, &candidates, &output_dir, config).await;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let archived = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - archived;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(results.len(), archived);
    }

    // ── Step 7: Regenerate the index over the whole tree ─────────────────
    let flat = walk::flatten(&all_children)?;
    let html = index::generate_index(&flat);
    let index_path = index::write_index(&output_dir, &html).await?;

    // ── Step 8: Advance the watermark ────────────────────────────────────
    // Only when every snapshot landed: advancing past a failed bookmark
    // would silence it forever, while holding back merely re-renders the
    // successes next run (overwrites are harmless).
    let watermark_advanced = failed == 0;
    if watermark_advanced {
        state::write_last_run(&output_dir, now).await?;
    } else {
        warn!(
            "{failed} snapshot(s) failed; watermark left at {last_run} so they qualify next run"
        );
    }

    let stats = RunStats {
        total_bookmarks: flat.len(),
        candidates: candidates.len(),
        archived,
        failed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
    };
    info!(
        "Run complete: {}/{} archived, {}ms total",
        archived, stats.candidates, stats.total_duration_ms
    );

    Ok(RunReport {
        results,
        stats,
        index_path,
        backup_path,
        watermark_advanced,
    })
}

/// Synchronous wrapper around [`archive`].
///
/// Creates a temporary tokio runtime internally.
pub fn archive_sync(config: &ArchiveConfig) -> Result<RunReport, ArchiveError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ArchiveError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(archive(config))
}

/// Summarise a bookmark store without rendering anything.
///
/// Does not require a browser and writes nothing.
pub async fn inspect(bookmarks_path: impl AsRef<Path>) -> Result<StoreSummary, ArchiveError> {
    let file = store::load_bookmarks(bookmarks_path.as_ref()).await?;

    let mut roots = Vec::new();
    let mut total = 0usize;
    let mut newest = None;
    for (key, root) in file.roots.in_order() {
        let flat = walk::flatten(&[root])?;
        total += flat.len();
        if let Some(root_newest) = flat.iter().map(|f| f.date).max() {
            newest = Some(newest.map_or(root_newest, |n: chrono::DateTime<Utc>| n.max(root_newest)));
        }
        roots.push((key.to_string(), flat.len()));
    }

    Ok(StoreSummary {
        total_bookmarks: total,
        roots,
        newest,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Pick the renderer: a caller-supplied one wins, otherwise a headless
/// Chrome wrapper built from the config's browser/timeout knobs.
fn resolve_renderer(config: &ArchiveConfig) -> Arc<dyn UrlRenderer> {
    if let Some(ref r) = config.renderer {
        return Arc::clone(r);
    }
    let mut renderer = HeadlessChromeRenderer::new(config.render_timeout_secs);
    if let Some(ref browser) = config.browser {
        renderer = renderer.with_browser(browser.clone());
    }
    Arc::new(renderer)
}

/// Render every candidate in order, one at a time.
///
/// Failures are captured per bookmark rather than propagated; one dead URL
/// must not cost the rest of the run (the watermark handling in [`archive`]
/// makes sure failures are retried next time).
async fn snapshot_all(
    renderer: &Arc<dyn UrlRenderer>,
    candidates: &[Candidate],
    output_dir: &Path,
    config: &ArchiveConfig,
) -> Vec<SnapshotResult> {
    let total = candidates.len();
    let mut results = Vec::with_capacity(total);

    for (i, candidate) in candidates.iter().enumerate() {
        let index = i + 1;
        let dest = snapshot_path(output_dir, &candidate.name);

        if let Some(ref cb) = config.progress_callback {
            cb.on_snapshot_start(index, total, &candidate.name);
        }

        let start = Instant::now();
        let outcome = renderer.render(&candidate.url, &dest).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(()) => {
                info!("Saved '{}' as PDF: {}", candidate.name, dest.display());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_snapshot_complete(index, total, &candidate.name);
                }
            }
            Err(e) => {
                warn!("Snapshot failed for '{}': {e}", candidate.name);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_snapshot_error(index, total, &candidate.name, &e.to_string());
                }
            }
        }

        results.push(SnapshotResult {
            name: candidate.name.clone(),
            url: candidate.url.clone(),
            date_added: candidate.date,
            pdf_path: dest,
            duration_ms,
            error: outcome.err(),
        });
    }

    results
}
