use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, ApplicationStatus};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const RECENT_MAX_DAYS: i64 = 7;
const FOLLOW_UP_MAX_DAYS: i64 = 14;

/// Attention badge for applications still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Recent,
    FollowUp,
    Stale,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recent => "Recent",
            Self::FollowUp => "Follow Up",
            Self::Stale => "Stale",
        }
    }

    fn from_age_days(age_days: i64) -> Self {
        if age_days > FOLLOW_UP_MAX_DAYS {
            Self::Stale
        } else if age_days > RECENT_MAX_DAYS {
            Self::FollowUp
        } else {
            Self::Recent
        }
    }
}

/// Whole days between two instants, rounded up. Direction is ignored.
pub fn age_in_days(date_applied: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - date_applied).num_milliseconds().abs();
    elapsed / MILLIS_PER_DAY + i64::from(elapsed % MILLIS_PER_DAY != 0)
}

/// Classifies how urgently an application needs attention. Terminal statuses carry no badge.
pub fn classify(
    date_applied: DateTime<Utc>,
    status: ApplicationStatus,
    now: DateTime<Utc>,
) -> Option<Urgency> {
    if status.is_terminal() {
        return None;
    }
    Some(Urgency::from_age_days(age_in_days(date_applied, now)))
}

impl ApplicationRecord {
    pub fn urgency(&self, now: DateTime<Utc>) -> Option<Urgency> {
        classify(self.date_applied, self.status, now)
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
    fn terminal_statuses_have_no_badge() {
        for days in [0, 3, 10, 400] {
            let applied = now() - Duration::days(days);
            assert_eq!(classify(applied, ApplicationStatus::Offer, now()), None);
            assert_eq!(classify(applied, ApplicationStatus::Rejected, now()), None);
        }
    }

    #[test]
    fn thresholds_round_partial_days_up() {
        let cases = [
            (Duration::zero(), Urgency::Recent),
            (Duration::hours(1), Urgency::Recent),
            (Duration::days(7), Urgency::Recent),
            (Duration::days(7) + Duration::seconds(1), Urgency::FollowUp),
            (Duration::days(14), Urgency::FollowUp),
            (Duration::days(14) + Duration::milliseconds(1), Urgency::Stale),
            (Duration::days(90), Urgency::Stale),
        ];

        for (age, expected) in cases {
            let applied = now() - age;
            assert_eq!(
                classify(applied, ApplicationStatus::Applied, now()),
                Some(expected),
                "age {age:?}"
            );
        }
    }

    #[test]
    fn future_dates_use_absolute_age() {
        let applied = now() + Duration::days(20);
        assert_eq!(
            classify(applied, ApplicationStatus::Interview, now()),
            Some(Urgency::Stale)
        );
        assert_eq!(age_in_days(applied, now()), 20);
    }

    #[test]
    fn classification_never_regresses_as_age_grows() {
        let mut previous = Urgency::Recent;
        for hours in (0..=24 * 30).step_by(5) {
            let applied = now() - Duration::hours(hours);
            let current = classify(applied, ApplicationStatus::Applied, now())
                .expect("non-terminal status yields a badge");
            assert!(current >= previous, "regressed at {hours}h");
            previous = current;
        }
        assert_eq!(previous, Urgency::Stale);
    }
}
