//! Launch countdown.
//!
//! The landing page ticks a days/hours/minutes/seconds display down to the
//! launch date once per second. Once the launch has passed it shows zeros.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Launch date the frontend shows until the API answers.
pub const DEFAULT_LAUNCH_DATE: &str = "2025-08-24T00:00:00Z";

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

/// Time remaining until launch, split for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    /// Whole days.
    pub days: u64,
    /// Hours past the last whole day (0-23).
    pub hours: u64,
    /// Minutes past the last whole hour (0-59).
    pub minutes: u64,
    /// Seconds past the last whole minute (0-59).
    pub seconds: u64,
}

impl TimeLeft {
    /// Whether the countdown has reached zero.
    pub const fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

/// Time from `now` until `launch`. Zero once `launch` is not in the future.
pub fn time_left(launch: DateTime<Utc>, now: DateTime<Utc>) -> TimeLeft {
    let remaining = launch.signed_duration_since(now).num_seconds();
    let Ok(total) = u64::try_from(remaining) else {
        return TimeLeft::default();
    };

    TimeLeft {
        days: total.div_euclid(SECS_PER_DAY),
        hours: total.rem_euclid(SECS_PER_DAY).div_euclid(SECS_PER_HOUR),
        minutes: total.rem_euclid(SECS_PER_HOUR).div_euclid(SECS_PER_MINUTE),
        seconds: total.rem_euclid(SECS_PER_MINUTE),
    }
}

/// Parse an RFC 3339 launch date such as the value stored in KV.
pub fn parse_launch_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// [`DEFAULT_LAUNCH_DATE`] as a timestamp.
pub fn default_launch_date() -> DateTime<Utc> {
    parse_launch_date(DEFAULT_LAUNCH_DATE).unwrap_or_else(|| {
        Utc.with_ymd_and_hms(2025, 8, 24, 0, 0, 0)
            .single()
            .unwrap_or_default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn splits_remaining_time() {
        let now = Utc.with_ymd_and_hms(2025, 8, 20, 12, 30, 15).unwrap();
        let left = time_left(default_launch_date(), now);
        assert_eq!(
            left,
            TimeLeft {
                days: 3,
                hours: 11,
                minutes: 29,
                seconds: 45,
            }
        );
    }

    #[test]
    fn past_launch_is_zero() {
        let launch = default_launch_date();
        assert!(time_left(launch, launch).is_zero());
        let later = launch.checked_add_signed(Duration::days(3)).unwrap();
        assert!(time_left(launch, later).is_zero());
    }

    #[test]
    fn parses_offsets_to_utc() {
        let at = parse_launch_date("2025-08-24T09:00:00+09:00").unwrap();
        assert_eq!(at, default_launch_date());
        assert!(parse_launch_date("next tuesday").is_none());
    }
}
