//! Relative age labels shown under thumbnails and in the viewer.

/// Formats the time elapsed between `timestamp` and `now` (both epoch millis).
///
/// Hours take precedence once at least one whole hour has passed; under a
/// minute (or a timestamp in the future) reads as "Just now".
pub fn relative_age(timestamp: u64, now: u64) -> String {
    let minutes = now.saturating_sub(timestamp) / 60_000;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;
    const SECOND: u64 = 1_000;
    const MINUTE: u64 = 60 * SECOND;
    const HOUR: u64 = 60 * MINUTE;

    #[test]
    fn under_a_minute_is_just_now() {
        assert_eq!(relative_age(NOW - 30 * SECOND, NOW), "Just now");
        assert_eq!(relative_age(NOW, NOW), "Just now");
    }

    #[test]
    fn minutes() {
        assert_eq!(relative_age(NOW - 5 * MINUTE, NOW), "5m ago");
        assert_eq!(relative_age(NOW - 59 * MINUTE - 59 * SECOND, NOW), "59m ago");
    }

    #[test]
    fn hours_take_precedence() {
        assert_eq!(relative_age(NOW - 3 * HOUR, NOW), "3h ago");
        assert_eq!(relative_age(NOW - HOUR - 30 * MINUTE, NOW), "1h ago");
        assert_eq!(relative_age(NOW - 23 * HOUR - 59 * MINUTE, NOW), "23h ago");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        assert_eq!(relative_age(NOW + 10 * MINUTE, NOW), "Just now");
    }
}
