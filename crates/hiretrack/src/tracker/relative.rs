use chrono::{DateTime, Utc};

/// Human readable "time since applied" for list rows.
pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    match hours / 24 {
        1 => "yesterday".to_string(),
        days if days < 7 => format!("{days} days ago"),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn buckets_elapsed_time() {
        let cases = [
            (Duration::seconds(5), "just now"),
            (Duration::minutes(12), "12m ago"),
            (Duration::hours(3), "3h ago"),
            (Duration::hours(30), "yesterday"),
            (Duration::days(4), "4 days ago"),
            (Duration::days(10), "2025-06-20"),
        ];

        for (age, expected) in cases {
            assert_eq!(relative_time(now() - age, now()), expected);
        }
    }

    #[test]
    fn future_dates_read_as_just_now() {
        assert_eq!(relative_time(now() + Duration::hours(5), now()), "just now");
    }
}
