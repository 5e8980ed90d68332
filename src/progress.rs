//! Progress-callback trait for per-bookmark archiving events.
//!
//! Inject an [`Arc<dyn ArchiveProgressCallback>`] via
//! [`crate::config::ArchiveConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline snapshots each candidate.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a log file, or a terminal progress bar
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` so holding it across await points is sound, even
//! though snapshots themselves run strictly one at a time.

use std::sync::Arc;

/// Called by the archiving pipeline as it processes each candidate bookmark.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Snapshots are sequential, so implementations will
/// never see two events for different bookmarks interleaved.
pub trait ArchiveProgressCallback: Send + Sync {
    /// Called once after filtering, before any snapshot is attempted.
    fn on_run_start(&self, candidates: usize) {
        let _ = candidates;
    }

    /// Called just before a bookmark's URL is handed to the renderer.
    ///
    /// `index` is 1-based within this run's candidates.
    fn on_snapshot_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a bookmark has been captured to PDF.
    fn on_snapshot_complete(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a bookmark's render failed.
    fn on_snapshot_error(&self, index: usize, total: usize, name: &str, error: &str) {
        let _ = (index, total, name, error);
    }

    /// Called once after all candidates have been attempted (before the
    /// index regeneration, which is near-instant).
    fn on_run_complete(&self, total: usize, archived: usize) {
        let _ = (total, archived);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ArchiveProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ArchiveConfig`].
pub type ProgressCallback = Arc<dyn ArchiveProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        final_archived: AtomicUsize,
    }

    impl ArchiveProgressCallback for TrackingCallback {
        fn on_snapshot_start(&self, _i: usize, _t: usize, _name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_snapshot_complete(&self, _i: usize, _t: usize, _name: &str) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_snapshot_error(&self, _i: usize, _t: usize, _name: &str, _e: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_run_complete(&self, _total: usize, archived: usize) {
            self.final_archived.store(archived, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(2);
        cb.on_snapshot_start(1, 2, "a");
        cb.on_snapshot_complete(1, 2, "a");
        cb.on_snapshot_error(2, 2, "b", "browser crashed");
        cb.on_run_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            final_archived: AtomicUsize::new(0),
        };
        t.on_run_start(2);
        t.on_snapshot_start(1, 2, "a");
        t.on_snapshot_complete(1, 2, "a");
        t.on_snapshot_start(2, 2, "b");
        t.on_snapshot_error(2, 2, "b", "timeout");
        t.on_run_complete(2, 1);

        assert_eq!(t.starts.load(Ordering::SeqCst), 2);
        assert_eq!(t.completes.load(Ordering::SeqCst), 1);
        assert_eq!(t.errors.load(Ordering::SeqCst), 1);
        assert_eq!(t.final_archived.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ArchiveProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_run_start(3);
        cb.on_snapshot_start(1, 3, "x");
    }
}
