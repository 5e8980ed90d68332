//! Error types for the bookmarks2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ArchiveError`] — **Fatal**: the run cannot proceed at all (bookmark
//!   file missing or unparseable, output directory not writable, watermark
//!   file corrupt). Returned as `Err(ArchiveError)` from the top-level
//!   `archive*` functions.
//!
//! * [`SnapshotError`] — **Non-fatal**: a single bookmark failed to render
//!   (browser crash, navigation timeout) but the rest of the run is fine.
//!   Stored inside [`crate::output::SnapshotResult`] so callers can inspect
//!   partial success rather than losing the whole run to one dead URL.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! failed snapshot, log and continue, or collect all errors for a post-run
//! report. Note the watermark is only advanced when every snapshot succeeds,
//! so failed bookmarks are retried on the next run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the bookmarks2pdf library.
///
/// Per-bookmark render failures use [`SnapshotError`] and are stored in
/// [`crate::output::SnapshotResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ArchiveError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Bookmark export file was not found at the given path.
    #[error("Bookmark file not found: '{path}'\nIs Chrome installed, and has it written a Bookmarks file yet?")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the bookmark file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bookmark file exists but is not valid JSON (or not a Chrome export).
    #[error("Failed to parse bookmark file '{path}': {detail}")]
    ParseFailed { path: PathBuf, detail: String },

    /// No home directory could be determined and no explicit paths were given.
    #[error("Could not determine the home directory.\nPass --bookmarks and --output-dir explicitly.")]
    NoHomeDir,

    // ── Timestamp errors ──────────────────────────────────────────────────
    /// A `date_added` value maps outside the representable date range.
    ///
    /// Chrome timestamps are microseconds since 1601-01-01; a corrupt or
    /// absurd value cannot always be represented as a `DateTime<Utc>`.
    #[error("Bookmark timestamp {micros} is outside the representable range")]
    TimestampOutOfRange { micros: i64 },

    // ── Watermark errors ──────────────────────────────────────────────────
    /// The last-run watermark file exists but its content is not a timestamp.
    #[error("Watermark file '{path}' is corrupt: {detail}\nDelete it to re-archive everything in the window.")]
    WatermarkInvalid { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the backup copy, the index, or the watermark.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single bookmark snapshot.
///
/// Stored alongside [`crate::output::SnapshotResult`] when a render fails.
/// The overall run continues; the watermark is simply not advanced so the
/// bookmark qualifies again next time.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum SnapshotError {
    /// No headless-capable browser binary was found on PATH.
    #[error("No headless browser found on PATH (tried chromium, chrome, google-chrome, chromium-browser)")]
    NoBrowser,

    /// The browser process could not be spawned.
    #[error("Failed to launch browser: {detail}")]
    SpawnFailed { detail: String },

    /// Navigation + render did not settle within the configured timeout.
    #[error("Rendering '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The browser exited without producing a PDF.
    #[error("Browser produced no PDF for '{url}' (exit status {status})")]
    NoOutput { url: String, status: String },

    /// The PDF was produced but could not be written to its destination.
    #[error("Failed to write snapshot to '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_not_found_display() {
        let e = ArchiveError::SourceNotFound {
            path: PathBuf::from("/tmp/Bookmarks"),
        };
        assert!(e.to_string().contains("/tmp/Bookmarks"));
    }

    #[test]
    fn timestamp_out_of_range_display() {
        let e = ArchiveError::TimestampOutOfRange { micros: -1 };
        assert!(e.to_string().contains("-1"));
    }

    #[test]
    fn snapshot_timeout_display() {
        let e = SnapshotError::Timeout {
            url: "http://example.com".into(),
            secs: 120,
        };
        let msg = e.to_string();
        assert!(msg.contains("example.com"), "got: {msg}");
        assert!(msg.contains("120"), "got: {msg}");
    }

    #[test]
    fn snapshot_error_round_trips_through_json() {
        let e = SnapshotError::NoBrowser;
        let json = serde_json::to_string(&e).unwrap();
        let back: SnapshotError = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, SnapshotError::NoBrowser));
    }
}
