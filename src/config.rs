//! Configuration for an archiving run.
//!
//! All behaviour is controlled through [`ArchiveConfig`], built via its
//! [`ArchiveConfigBuilder`]. Everything has a sensible default so that
//! `bm2pdf` with no flags archives the current user's Chrome profile into
//! `~/Documents/bookmarkstorage/`.
//!
//! The two ambient inputs the pipeline would otherwise read implicitly, the
//! current time and the home directory, are injectable fields (`now`,
//! `home_dir`). Tests pin them; production leaves them unset. `now` is also
//! what guarantees a single reference time per run: the 7-day window and the
//! watermark written at the end both use the same snapshot.

use crate::error::ArchiveError;
use crate::pipeline::render::UrlRenderer;
use crate::progress::ProgressCallback;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for a bookmark-archiving run.
///
/// Built via [`ArchiveConfig::builder()`] or [`ArchiveConfig::default()`].
///
/// # Example
/// ```rust
/// use bookmarks2pdf::ArchiveConfig;
///
/// let config = ArchiveConfig::builder()
///     .output_dir("/tmp/bookmarks")
///     .window_days(14)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ArchiveConfig {
    /// Path to Chrome's `Bookmarks` export. Default: the profile-relative
    /// location under the home directory (see [`ArchiveConfig::resolve_bookmarks_path`]).
    pub bookmarks_path: Option<PathBuf>,

    /// Directory receiving PDFs, the index, the backup, and the watermark.
    /// Default: `<home>/Documents/bookmarkstorage/`. Created if absent.
    pub output_dir: Option<PathBuf>,

    /// Trailing window, in days, a bookmark must fall inside to be archived.
    /// Default: 7. Must be ≥ 1.
    ///
    /// The window bounds how much one run can re-process after a crash: an
    /// interrupted run never advances the watermark, and the next run only
    /// revisits additions still inside the window.
    pub window_days: i64,

    /// Per-snapshot render budget in seconds. Default: 120.
    ///
    /// Covers browser spawn, navigation, and PDF capture. A hanging target
    /// page costs at most this long instead of stalling the run forever.
    pub render_timeout_secs: u64,

    /// Browser binary override (e.g. "chromium-browser"). Default: probe
    /// PATH for the usual Chromium/Chrome names.
    pub browser: Option<String>,

    /// Pre-constructed renderer. Takes precedence over `browser` and the
    /// PATH probe. This is the seam tests use to avoid a real browser.
    pub renderer: Option<Arc<dyn UrlRenderer>>,

    /// Progress callback for per-snapshot events.
    pub progress_callback: Option<ProgressCallback>,

    /// Injected "current time". Default: `Utc::now()` snapshotted once at
    /// the start of the run.
    pub now: Option<DateTime<Utc>>,

    /// Injected home directory for default-path resolution.
    /// Default: `dirs::home_dir()`.
    pub home_dir: Option<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            bookmarks_path: None,
            output_dir: None,
            window_days: 7,
            render_timeout_secs: 120,
            browser: None,
            renderer: None,
            progress_callback: None,
            now: None,
            home_dir: None,
        }
    }
}

impl fmt::Debug for ArchiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveConfig")
            .field("bookmarks_path", &self.bookmarks_path)
            .field("output_dir", &self.output_dir)
            .field("window_days", &self.window_days)
            .field("render_timeout_secs", &self.render_timeout_secs)
            .field("browser", &self.browser)
            .field("renderer", &self.renderer.as_ref().map(|_| "<dyn UrlRenderer>"))
            .field("now", &self.now)
            .field("home_dir", &self.home_dir)
            .finish()
    }
}

impl ArchiveConfig {
    /// Create a new builder, seeded with defaults.
    pub fn builder() -> ArchiveConfigBuilder {
        ArchiveConfigBuilder {
            config: Self::default(),
        }
    }

    /// The effective bookmark-file path: the explicit override, or the
    /// platform's Chrome default-profile location under `home`.
    pub fn resolve_bookmarks_path(&self, home: &Path) -> PathBuf {
        if let Some(ref p) = self.bookmarks_path {
            return p.clone();
        }
        if cfg!(target_os = "macos") {
            home.join("Library/Application Support/Google/Chrome/Default/Bookmarks")
        } else if cfg!(target_os = "windows") {
            home.join("AppData/Local/Google/Chrome/User Data/Default/Bookmarks")
        } else {
            home.join(".config/google-chrome/Default/Bookmarks")
        }
    }

    /// The effective output directory: the explicit override, or
    /// `<home>/Documents/bookmarkstorage/`.
    pub fn resolve_output_dir(&self, home: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| home.join("Documents/bookmarkstorage"))
    }

    /// The effective home directory, from the injected override or the OS.
    pub fn resolve_home(&self) -> Result<PathBuf, ArchiveError> {
        if let Some(ref h) = self.home_dir {
            return Ok(h.clone());
        }
        // Only consult the OS when a default path is actually needed.
        if self.bookmarks_path.is_some() && self.output_dir.is_some() {
            return Ok(PathBuf::new());
        }
        dirs::home_dir().ok_or(ArchiveError::NoHomeDir)
    }
}

/// Builder for [`ArchiveConfig`].
#[derive(Debug)]
pub struct ArchiveConfigBuilder {
    config: ArchiveConfig,
}

impl ArchiveConfigBuilder {
    pub fn bookmarks_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.bookmarks_path = Some(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(path.into());
        self
    }

    pub fn window_days(mut self, days: i64) -> Self {
        self.config.window_days = days;
        self
    }

    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs.max(1);
        self
    }

    pub fn browser(mut self, binary: impl Into<String>) -> Self {
        self.config.browser = Some(binary.into());
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn UrlRenderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.config.now = Some(now);
        self
    }

    pub fn home_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.home_dir = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ArchiveConfig, ArchiveError> {
        let c = &self.config;
        if c.window_days < 1 {
            return Err(ArchiveError::InvalidConfig(format!(
                "window_days must be ≥ 1, got {}",
                c.window_days
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = ArchiveConfig::builder().build().unwrap();
        assert_eq!(c.window_days, 7);
        assert_eq!(c.render_timeout_secs, 120);
        assert!(c.bookmarks_path.is_none());
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = ArchiveConfig::builder().window_days(0).build().unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidConfig(_)));
    }

    #[test]
    fn explicit_paths_win_over_home() {
        let c = ArchiveConfig::builder()
            .bookmarks_path("/x/Bookmarks")
            .output_dir("/y/out")
            .build()
            .unwrap();
        let home = Path::new("/home/u");
        assert_eq!(c.resolve_bookmarks_path(home), PathBuf::from("/x/Bookmarks"));
        assert_eq!(c.resolve_output_dir(home), PathBuf::from("/y/out"));
    }

    #[test]
    fn default_output_dir_is_under_documents() {
        let c = ArchiveConfig::builder().build().unwrap();
        let out = c.resolve_output_dir(Path::new("/home/u"));
        assert_eq!(out, PathBuf::from("/home/u/Documents/bookmarkstorage"));
    }

    #[test]
    fn injected_home_is_used() {
        let c = ArchiveConfig::builder().home_dir("/tmp/fakehome").build().unwrap();
        assert_eq!(c.resolve_home().unwrap(), PathBuf::from("/tmp/fakehome"));
    }
}
