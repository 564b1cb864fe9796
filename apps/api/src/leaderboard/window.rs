//! Trailing-window date arithmetic for the box-office leaderboard.
//!
//! Window starts are calendar subtractions from an explicit `now` (same
//! month/day one year earlier for yearly, one calendar month earlier with
//! end-of-month clamping for monthly), not fixed 365/30-day deltas.

use chrono::{Days, Months, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn parse(s: &str) -> Option<Period> {
        match s {
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            "yearly" => Some(Period::Yearly),
            _ => None,
        }
    }
}

/// Start of the trailing window ending at `now`. A release is in the window
/// when `start < release_date <= now`. Saturates at the representable date
/// limit.
pub fn window_start(period: Period, now: NaiveDate) -> NaiveDate {
    let start = match period {
        Period::Weekly => now.checked_sub_days(Days::new(7)),
        Period::Monthly => now.checked_sub_months(Months::new(1)),
        Period::Yearly => now.checked_sub_months(Months::new(12)),
    };
    start.unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekly_start_is_seven_days_back() {
        assert_eq!(window_start(Period::Weekly, d(2024, 6, 15)), d(2024, 6, 8));
    }

    #[test]
    fn test_weekly_includes_six_days_ago_excludes_eight() {
        let now = d(2024, 6, 15);
        let start = window_start(Period::Weekly, now);
        let six_days_ago = d(2024, 6, 9);
        let eight_days_ago = d(2024, 6, 7);
        assert!(six_days_ago > start && six_days_ago <= now);
        assert!(!(eight_days_ago > start));
    }

    #[test]
    fn test_monthly_is_calendar_month_not_thirty_days() {
        // March 31 minus one calendar month clamps to the end of February
        assert_eq!(window_start(Period::Monthly, d(2024, 3, 31)), d(2024, 2, 29));
        assert_eq!(window_start(Period::Monthly, d(2023, 3, 31)), d(2023, 2, 28));
    }

    #[test]
    fn test_monthly_same_day_previous_month() {
        assert_eq!(window_start(Period::Monthly, d(2024, 7, 15)), d(2024, 6, 15));
    }

    #[test]
    fn test_yearly_same_month_and_day() {
        assert_eq!(window_start(Period::Yearly, d(2024, 6, 15)), d(2023, 6, 15));
    }

    #[test]
    fn test_yearly_from_leap_day_clamps() {
        assert_eq!(window_start(Period::Yearly, d(2024, 2, 29)), d(2023, 2, 28));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(Period::parse("weekly"), Some(Period::Weekly));
        assert_eq!(Period::parse("quarterly"), None);
    }
}
