//! Chrome (WebKit) timestamp conversion.
//!
//! Chrome stores `date_added` as **microseconds since 1601-01-01T00:00:00Z**,
//! the Windows FILETIME epoch, not the Unix epoch. The fixed offset between
//! the two epochs is 369 years including 89 leap days:
//!
//! ```text
//! (369 * 365 + 89) days * 86 400 s/day = 11 644 473 600 s
//! ```
//!
//! Subtracting the offset (in microseconds) reinterprets the value on the
//! Unix epoch, from which chrono can build a `DateTime<Utc>`.

use crate::error::ArchiveError;
use chrono::{DateTime, Utc};

/// Seconds between 1601-01-01 and 1970-01-01.
const EPOCH_OFFSET_SECS: i64 = (369 * 365 + 89) * 24 * 3600;

/// Microseconds between 1601-01-01 and 1970-01-01.
const EPOCH_OFFSET_MICROS: i64 = EPOCH_OFFSET_SECS * 1_000_000;

/// Convert a Chrome `date_added` value to an absolute UTC timestamp.
///
/// `chrome_time_to_utc(0)` is exactly 1601-01-01T00:00:00Z, and the result
/// is monotonically increasing in the input. Values are not range-checked
/// beyond what `DateTime<Utc>` can represent; a corrupt input far outside
/// chrono's ±262 000-year range surfaces as
/// [`ArchiveError::TimestampOutOfRange`].
pub fn chrome_time_to_utc(micros: i64) -> Result<DateTime<Utc>, ArchiveError> {
    let unix_micros = micros
        .checked_sub(EPOCH_OFFSET_MICROS)
        .ok_or(ArchiveError::TimestampOutOfRange { micros })?;
    DateTime::<Utc>::from_timestamp_micros(unix_micros)
        .ok_or(ArchiveError::TimestampOutOfRange { micros })
}

/// Reverse conversion for building test fixtures. Not part of the public
/// pipeline — the system itself only ever converts one way.
#[cfg(test)]
pub mod tests_support {
    use super::EPOCH_OFFSET_MICROS;
    use chrono::{DateTime, Utc};

    pub fn utc_to_chrome_micros(dt: DateTime<Utc>) -> i64 {
        dt.timestamp_micros() + EPOCH_OFFSET_MICROS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zero_is_the_windows_epoch() {
        let dt = chrome_time_to_utc(0).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn offset_maps_to_unix_epoch() {
        let dt = chrome_time_to_utc(EPOCH_OFFSET_MICROS).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn monotonically_increasing() {
        let samples = [0, 1, 1_000_000, EPOCH_OFFSET_MICROS, 13_345_000_000_000_000];
        let converted: Vec<_> = samples
            .iter()
            .map(|&m| chrome_time_to_utc(m).unwrap())
            .collect();
        for pair in converted.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn known_real_world_value() {
        // 13 345 000 000 000 000 µs ≈ 2023-11-15, sanity-check the century.
        let dt = chrome_time_to_utc(13_345_000_000_000_000).unwrap();
        assert_eq!(dt.format("%Y").to_string(), "2023");
    }

    #[test]
    fn far_out_of_range_is_an_error() {
        assert!(matches!(
            chrome_time_to_utc(i64::MIN),
            Err(ArchiveError::TimestampOutOfRange { .. })
        ));
        assert!(matches!(
            chrome_time_to_utc(i64::MAX),
            Err(ArchiveError::TimestampOutOfRange { .. })
        ));
    }
}
