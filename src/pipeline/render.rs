//! URL-to-PDF rendering via a headless browser.
//!
//! ## Why a trait?
//!
//! Rendering is the only blocking external dependency of the whole pipeline,
//! and the only one that cannot run in CI. Putting it behind [`UrlRenderer`]
//! lets tests substitute a mock that writes a stub PDF, while production uses
//! [`HeadlessChromeRenderer`] — a subprocess wrapper, not a CDP client, so
//! there is no protocol state to manage and no browser library to vendor.
//!
//! ## Why a subprocess?
//!
//! `chromium --headless --print-to-pdf=<dest> <url>` navigates, waits for the
//! page to settle, writes the PDF, and exits. One process per snapshot keeps
//! sessions fully isolated: a crashed or hung renderer can be killed without
//! touching anything else, and there is never more than one page open at a
//! time (renders are strictly sequential by design).

use crate::error::SnapshotError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Browser binaries to probe, in preference order.
const CANDIDATE_BROWSERS: &[&str] = &["chromium", "chrome", "google-chrome", "chromium-browser"];

/// The render capability: navigate `url` and capture it as a PDF at `dest`.
///
/// Implementations must be `Send + Sync`; the pipeline holds one behind an
/// `Arc<dyn UrlRenderer>` and calls it once per candidate bookmark.
#[async_trait]
pub trait UrlRenderer: Send + Sync {
    async fn render(&self, url: &str, dest: &Path) -> Result<(), SnapshotError>;
}

/// Renders pages by spawning a headless Chromium/Chrome process.
pub struct HeadlessChromeRenderer {
    /// Browser binary. Resolved from PATH when not set explicitly.
    browser: Option<String>,
    /// Per-snapshot wall-clock budget covering spawn, navigation, and render.
    timeout: Duration,
}

impl HeadlessChromeRenderer {
    /// Create a renderer that probes PATH for a browser at render time.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            browser: None,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Use a specific browser binary instead of probing PATH.
    pub fn with_browser(mut self, binary: impl Into<String>) -> Self {
        self.browser = Some(binary.into());
        self
    }

    /// Detect the first headless-capable browser binary on PATH.
    pub fn detect_browser() -> Option<String> {
        for candidate in CANDIDATE_BROWSERS {
            if on_path(candidate) {
                debug!(browser = *candidate, "headless browser detected on PATH");
                return Some((*candidate).to_string());
            }
        }
        None
    }

    fn resolve_browser(&self) -> Result<String, SnapshotError> {
        match &self.browser {
            Some(b) => Ok(b.clone()),
            None => Self::detect_browser().ok_or(SnapshotError::NoBrowser),
        }
    }
}

#[async_trait]
impl UrlRenderer for HeadlessChromeRenderer {
    async fn render(&self, url: &str, dest: &Path) -> Result<(), SnapshotError> {
        let browser = self.resolve_browser()?;

        // Fresh profile dir per render: avoids the lock held by a running
        // Chrome on the real profile, and is cleaned up on drop.
        let profile = TempDir::new().map_err(|e| SnapshotError::SpawnFailed {
            detail: e.to_string(),
        })?;

        let mut cmd = Command::new(&browser);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .arg(format!("--print-to-pdf={}", dest.display()))
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!(browser = %browser, url = %url, "spawning headless browser");

        let mut child = cmd.spawn().map_err(|e| SnapshotError::SpawnFailed {
            detail: e.to_string(),
        })?;

        match timeout(self.timeout, child.wait()).await {
            Err(_elapsed) => {
                // Hung navigation — kill the child to avoid zombie processes.
                let _ = child.kill().await;
                warn!(url = %url, secs = self.timeout.as_secs(), "render timed out");
                return Err(SnapshotError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
            Ok(Err(e)) => {
                return Err(SnapshotError::SpawnFailed {
                    detail: e.to_string(),
                });
            }
            Ok(Ok(status)) => {
                if !status.success() {
                    warn!(url = %url, status = ?status, "browser exited with non-zero status");
                    // Fall through: headless Chrome sometimes exits non-zero
                    // after still writing a usable PDF.
                }
                if !pdf_written(dest) {
                    return Err(SnapshotError::NoOutput {
                        url: url.to_string(),
                        status: status.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// The browser signals success only through the file it writes: present and
/// non-empty means the capture worked.
fn pdf_written(dest: &Path) -> bool {
    std::fs::metadata(dest).map(|m| m.len() > 0).unwrap_or(false)
}

/// Derive the snapshot filename from a bookmark's display name.
///
/// `/` is the one character that would break the flat output layout; it is
/// replaced with `-` and `.pdf` appended. Two bookmarks mapping to the same
/// filename silently overwrite each other — the archive is not deduplicated.
pub fn snapshot_filename(name: &str) -> String {
    format!("{}.pdf", name.replace('/', "-"))
}

/// Destination path for a bookmark's snapshot inside `output_dir`.
pub fn snapshot_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(snapshot_filename(name))
}

fn on_path(binary: &str) -> bool {
    if let Ok(path_var) = std::env::var("PATH") {
        for dir in path_var.split(':') {
            if Path::new(dir).join(binary).is_file() {
                return true;
            }
        }
    }
    false
}
