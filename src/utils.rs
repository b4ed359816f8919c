// Utility helpers

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn plural(count: i64, unit: &str) -> String {
    if count > 1 {
        format!("{} {}s ago", count, unit)
    } else {
        format!("{} {} ago", count, unit)
    }
}

/// Coarse age of `timestamp` relative to `now`, both epoch millis.
/// Timestamps in the future read as "Just now".
pub fn format_relative_age(now: i64, timestamp: i64) -> String {
    let minutes = now.saturating_sub(timestamp).max(0) / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn relative_age_picks_largest_unit() {
        let now = 10 * DAY;
        assert_eq!(format_relative_age(now, now - 3 * DAY - 5 * HOUR), "3 days ago");
        assert_eq!(format_relative_age(now, now - 2 * HOUR - 59 * MINUTE), "2 hours ago");
        assert_eq!(format_relative_age(now, now - 45 * MINUTE), "45 minutes ago");
    }

    #[test]
    fn relative_age_uses_singular_for_one() {
        let now = 10 * DAY;
        assert_eq!(format_relative_age(now, now - DAY), "1 day ago");
        assert_eq!(format_relative_age(now, now - HOUR), "1 hour ago");
        assert_eq!(format_relative_age(now, now - MINUTE), "1 minute ago");
    }

    #[test]
    fn relative_age_under_a_minute_or_future_is_just_now() {
        let now = 10 * DAY;
        assert_eq!(format_relative_age(now, now - 59_999), "Just now");
        assert_eq!(format_relative_age(now, now), "Just now");
        assert_eq!(format_relative_age(now, now + HOUR), "Just now");
    }
}
