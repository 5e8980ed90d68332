//! Result types returned by the archiving entry points.

use crate::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one candidate bookmark's snapshot attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResult {
    /// Bookmark display name (pre-sanitisation).
    pub name: String,
    /// Target URL that was rendered.
    pub url: String,
    /// When the bookmark was added, converted from the Chrome epoch.
    pub date_added: DateTime<Utc>,
    /// Destination the PDF was (or would have been) written to.
    pub pdf_path: PathBuf,
    /// Wall-clock time for this snapshot.
    pub duration_ms: u64,
    /// `None` on success; the render failure otherwise.
    pub error: Option<SnapshotError>,
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Url bookmarks in the whole tree (all roots, unfiltered).
    pub total_bookmarks: usize,
    /// Bookmarks that passed the window + watermark gate.
    pub candidates: usize,
    /// Candidates successfully archived.
    pub archived: usize,
    /// Candidates whose render failed.
    pub failed: usize,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
    /// Time spent inside the renderer, summed over candidates.
    pub render_duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per candidate, in traversal order.
    pub results: Vec<SnapshotResult>,
    pub stats: RunStats,
    /// Path of the regenerated HTML index.
    pub index_path: PathBuf,
    /// Path of the verbatim backup copy.
    pub backup_path: PathBuf,
    /// Whether `last_run.txt` was advanced. False when any snapshot failed,
    /// so failed bookmarks qualify again on the next run.
    pub watermark_advanced: bool,
}

impl RunReport {
    /// The results that failed, in traversal order.
    pub fn failures(&self) -> impl Iterator<Item = &SnapshotResult> {
        self.results.iter().filter(|r| r.error.is_some())
    }
}

/// Summary of a bookmark store, produced by [`crate::archive::inspect`]
/// without touching a browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSummary {
    /// Url bookmarks across all roots.
    pub total_bookmarks: usize,
    /// `(root key, url bookmark count)` for each root present in the file.
    pub roots: Vec<(String, usize)>,
    /// Most recent `date_added` in the tree, if any bookmark exists.
    pub newest: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_filters_errored_results() {
        let ok = SnapshotResult {
            name: "a".into(),
            url: "http://a".into(),
            date_added: Utc::now(),
            pdf_path: PathBuf::from("/tmp/a.pdf"),
            duration_ms: 10,
            error: None,
        };
        let bad = SnapshotResult {
            error: Some(SnapshotError::NoBrowser),
            name: "b".into(),
            ..ok.clone()
        };
        let report = RunReport {
            results: vec![ok, bad],
            stats: RunStats::default(),
            index_path: PathBuf::from("/tmp/Bookmarks.html"),
            backup_path: PathBuf::from("/tmp/BookmarksBackup.json"),
            watermark_advanced: false,
        };
        let failed: Vec<_> = report.failures().map(|r| r.name.as_str()).collect();
        assert_eq!(failed, vec!["b"]);
    }

    #[test]
    fn report_serialises_to_json() {
        let report = RunReport {
            results: vec![],
            stats: RunStats::default(),
            index_path: PathBuf::from("/out/Bookmarks.html"),
            backup_path: PathBuf::from("/out/BookmarksBackup.json"),
            watermark_advanced: true,
        };
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("watermark_advanced"));
    }
}
