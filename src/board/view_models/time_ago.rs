//! Relative timestamps for post and comment headers.

use chrono::Utc;

/// Current time in seconds since epoch
pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

/// "N unit(s) ago" relative to `now`
pub fn time_ago(timestamp: i64, now: i64) -> String {
    let diff = (now - timestamp).max(0);
    let (amount, unit) = if diff < 60 {
        (diff, "second")
    } else if diff < 3_600 {
        (diff / 60, "minute")
    } else if diff < 86_400 {
        (diff / 3_600, "hour")
    } else {
        (diff / 86_400, "day")
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_ago_should_pick_largest_unit() {
        assert_eq!(time_ago(100, 100), "0 seconds ago");
        assert_eq!(time_ago(99, 100), "1 second ago");
        assert_eq!(time_ago(0, 150), "2 minutes ago");
        assert_eq!(time_ago(0, 3_600), "1 hour ago");
        assert_eq!(time_ago(0, 3 * 86_400 + 5), "3 days ago");
    }

    #[test]
    fn future_timestamps_should_clamp_to_zero() {
        assert_eq!(time_ago(200, 100), "0 seconds ago");
    }
}
