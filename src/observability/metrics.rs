//! Fetch metrics.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

use crate::common::error::ErrorKind;

pub const FETCH_SUCCESS_TOTAL: &str = "swimmeet_fetch_success_total";
pub const FETCH_ERROR_TOTAL: &str = "swimmeet_fetch_error_total";
pub const FETCH_SKIPPED_TOTAL: &str = "swimmeet_fetch_skipped_total";
pub const ROWS_WRITTEN_TOTAL: &str = "swimmeet_rows_written_total";
pub const FETCH_DURATION_SECONDS: &str = "swimmeet_fetch_duration_seconds";

pub struct FetchMetrics;

impl FetchMetrics {
    /// Record an event fetched, parsed and written
    pub fn record_success(rows: usize, duration_secs: f64) {
        ::metrics::counter!(FETCH_SUCCESS_TOTAL).increment(1);
        ::metrics::counter!(ROWS_WRITTEN_TOTAL).increment(rows as u64);
        ::metrics::histogram!(FETCH_DURATION_SECONDS).record(duration_secs);
    }

    pub fn record_error(kind: ErrorKind, duration_secs: f64) {
        ::metrics::counter!(FETCH_ERROR_TOTAL, "kind" => kind.as_str()).increment(1);
        ::metrics::histogram!(FETCH_DURATION_SECONDS).record(duration_secs);
    }

    pub fn record_skipped() {
        ::metrics::counter!(FETCH_SKIPPED_TOTAL).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        FetchMetrics::record_success(3, 0.25);
        FetchMetrics::record_error(ErrorKind::Fetch, 1.0);
        FetchMetrics::record_skipped();
    }

    #[test]
    fn test_metric_names_share_prefix() {
        for name in [
            FETCH_SUCCESS_TOTAL,
            FETCH_ERROR_TOTAL,
            FETCH_SKIPPED_TOTAL,
            ROWS_WRITTEN_TOTAL,
            FETCH_DURATION_SECONDS,
        ] {
            assert!(name.starts_with("swimmeet_"));
        }
    }
}
