//! Calendar classification of move dates.
//!
//! This module determines whether a move date is an ordinary weekday, a
//! weekend day or one of the listed German public holidays. Holidays take
//! precedence over weekends.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Calendar category of a move date.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::{DayCategory, day_category};
/// use chrono::NaiveDate;
///
/// // 2025-06-14 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
/// assert_eq!(day_category(saturday), DayCategory::Weekend);
///
/// // Christmas Day 2022 fell on a Sunday; the holiday wins
/// let christmas = NaiveDate::from_ymd_opt(2022, 12, 25).unwrap();
/// assert_eq!(day_category(christmas), DayCategory::Holiday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCategory {
    /// Monday through Friday, not a holiday.
    Weekday,
    /// Saturday or Sunday, not a holiday.
    Weekend,
    /// A listed public holiday, whatever the day of the week.
    Holiday,
}

impl std::fmt::Display for DayCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayCategory::Weekday => write!(f, "Weekday"),
            DayCategory::Weekend => write!(f, "Weekend"),
            DayCategory::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Nationwide fixed-date public holidays as `(month, day, name)`.
pub const GERMAN_PUBLIC_HOLIDAYS: [(u32, u32, &str); 5] = [
    (1, 1, "Neujahr"),
    (5, 1, "Tag der Arbeit"),
    (10, 3, "Tag der Deutschen Einheit"),
    (12, 25, "1. Weihnachtstag"),
    (12, 26, "2. Weihnachtstag"),
];

/// Returns the name of the public holiday on `date`, if any.
pub fn german_holiday(date: NaiveDate) -> Option<&'static str> {
    GERMAN_PUBLIC_HOLIDAYS
        .iter()
        .find(|(month, day, _)| date.month() == *month && date.day() == *day)
        .map(|(_, _, name)| *name)
}

/// Returns true for Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Classifies a move date. A holiday on a weekend is a [`DayCategory::Holiday`].
pub fn day_category(date: NaiveDate) -> DayCategory {
    if german_holiday(date).is_some() {
        DayCategory::Holiday
    } else if is_weekend(date) {
        DayCategory::Weekend
    } else {
        DayCategory::Weekday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_listed_holidays_detected() {
        assert_eq!(german_holiday(date(2025, 1, 1)), Some("Neujahr"));
        assert_eq!(german_holiday(date(2025, 5, 1)), Some("Tag der Arbeit"));
        assert_eq!(
            german_holiday(date(2025, 10, 3)),
            Some("Tag der Deutschen Einheit")
        );
        assert_eq!(german_holiday(date(2025, 12, 25)), Some("1. Weihnachtstag"));
        assert_eq!(german_holiday(date(2025, 12, 26)), Some("2. Weihnachtstag"));
    }

    #[test]
    fn test_ordinary_date_is_not_holiday() {
        assert_eq!(german_holiday(date(2025, 12, 24)), None);
        assert_eq!(german_holiday(date(2025, 7, 15)), None);
    }

    #[test]
    fn test_weekend_detection() {
        assert!(is_weekend(date(2025, 6, 14))); // Saturday
        assert!(is_weekend(date(2025, 6, 15))); // Sunday
        assert!(!is_weekend(date(2025, 6, 16))); // Monday
    }

    #[test]
    fn test_weekday_category() {
        assert_eq!(day_category(date(2025, 7, 15)), DayCategory::Weekday);
    }

    #[test]
    fn test_holiday_on_weekday() {
        // 2025-05-01 is a Thursday
        assert_eq!(day_category(date(2025, 5, 1)), DayCategory::Holiday);
    }

    #[test]
    fn test_holiday_on_sunday_is_holiday() {
        assert_eq!(day_category(date(2022, 12, 25)), DayCategory::Holiday);
    }

    #[test]
    fn test_holiday_on_saturday_is_holiday() {
        // 2026-10-03 is a Saturday
        assert_eq!(day_category(date(2026, 10, 3)), DayCategory::Holiday);
    }

    #[test]
    fn test_display() {
        assert_eq!(DayCategory::Weekend.to_string(), "Weekend");
    }
}
