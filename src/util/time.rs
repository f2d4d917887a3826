//! Timing helpers
//!
//! Durations are reported in milliseconds with sub-millisecond precision;
//! thread launches take microseconds, so whole milliseconds would read as zero.

use std::time::Duration;

/// Duration as fractional milliseconds
#[inline]
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Format a duration as milliseconds
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use procbench::util::time::format_millis;
///
/// assert_eq!(format_millis(Duration::from_micros(1500)), "1.500 ms");
/// assert_eq!(format_millis(Duration::from_nanos(250)), "0.000 ms");
/// assert_eq!(format_millis(Duration::from_secs(2)), "2000.000 ms");
/// ```
pub fn format_millis(duration: Duration) -> String {
    format!("{:.3} ms", as_millis_f64(duration))
}
