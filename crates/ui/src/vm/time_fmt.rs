use chrono::{DateTime, Duration, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// `42s`, `3m 07s`, `1h 02m`. Negative spans read as zero.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use quiz_core::time::fixed_now;

    use super::*;

    #[test]
    fn elapsed_picks_the_two_largest_units() {
        assert_eq!(format_elapsed(Duration::seconds(42)), "42s");
        assert_eq!(format_elapsed(Duration::seconds(187)), "3m 07s");
        assert_eq!(format_elapsed(Duration::seconds(3_720)), "1h 02m");
        assert_eq!(format_elapsed(Duration::seconds(-5)), "0s");
    }

    #[test]
    fn datetime_is_minute_precision_utc() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13 UTC");
    }
}
