//! Run-state watermark: the timestamp of the last successful run.
//!
//! A single plain-text file, `<outputDir>/last_run.txt`, holding one line in
//! `YYYY-MM-DD HH:MM:SS` (UTC, no timezone suffix). It is read once at the
//! start of a run and overwritten with the run's snapshot time only after
//! all archiving has completed — an end-of-run watermark, not a checkpoint.
//! A crash mid-run leaves the prior value intact, so the next run simply
//! re-qualifies whatever the interrupted one had started on.

use crate::error::ArchiveError;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::Path;
use tracing::debug;

/// Fixed watermark filename inside the output directory.
pub const WATERMARK_FILENAME: &str = "last_run.txt";

const WATERMARK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read the last-run watermark from `output_dir`.
///
/// A missing file is the fresh-directory case and yields the minimum
/// representable timestamp, so on a first run every bookmark inside the
/// window qualifies. A file that exists but does not parse is fatal —
/// silently resetting it would re-archive everything without the user
/// asking for that.
pub async fn read_last_run(output_dir: &Path) -> Result<DateTime<Utc>, ArchiveError> {
    let path = output_dir.join(WATERMARK_FILENAME);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No watermark at {}, starting from the epoch", path.display());
            return Ok(DateTime::<Utc>::MIN_UTC);
        }
        Err(e) => {
            return Err(ArchiveError::WatermarkInvalid {
                path,
                detail: e.to_string(),
            });
        }
    };

    let parsed = NaiveDateTime::parse_from_str(raw.trim(), WATERMARK_FORMAT).map_err(|e| {
        ArchiveError::WatermarkInvalid {
            path,
            detail: e.to_string(),
        }
    })?;
    Ok(parsed.and_utc())
}

/// Overwrite the watermark in `output_dir` with `now`.
///
/// Must only be called after every snapshot of the run has completed.
pub async fn write_last_run(output_dir: &Path, now: DateTime<Utc>) -> Result<(), ArchiveError> {
    let path = output_dir.join(WATERMARK_FILENAME);
    let text = now.format(WATERMARK_FORMAT).to_string();
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| ArchiveError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    debug!("Watermark advanced to {} in {}", now, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn fresh_directory_yields_minimum_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let got = read_last_run(dir.path()).await.unwrap();
        assert_eq!(got, DateTime::<Utc>::MIN_UTC);
    }

    #[tokio::test]
    async fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 18, 45, 7).unwrap();
        write_last_run(dir.path(), now).await.unwrap();

        let text = tokio::fs::read_to_string(dir.path().join(WATERMARK_FILENAME))
            .await
            .unwrap();
        assert_eq!(text, "2024-03-15 18:45:07");

        let got = read_last_run(dir.path()).await.unwrap();
        assert_eq!(got, now);
    }

    #[tokio::test]
    async fn subsecond_precision_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 18, 45, 7).unwrap()
            + chrono::Duration::milliseconds(999);
        write_last_run(dir.path(), now).await.unwrap();
        let got = read_last_run(dir.path()).await.unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2024, 3, 15, 18, 45, 7).unwrap());
    }

    #[tokio::test]
    async fn corrupt_watermark_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(WATERMARK_FILENAME), "yesterday-ish")
            .await
            .unwrap();
        let err = read_last_run(dir.path()).await.unwrap_err();
        assert!(matches!(err, ArchiveError::WatermarkInvalid { .. }));
    }
}
