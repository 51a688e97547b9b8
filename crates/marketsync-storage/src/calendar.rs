//! Trading day calendars.

use chrono::{Datelike, NaiveDate, Weekday};

use marketsync_types::SecurityId;

/// The trading calendar of a security's board.
///
/// Used by the sync engine to skip non-trading dates when the task is
/// configured to ignore weekends and holidays.
pub trait BoardCalendar: Send + Sync {
    /// Returns true if the board trades the given security on the date.
    fn is_trade_date(&self, security: &SecurityId, date: NaiveDate) -> bool;
}

/// Calendar treating Monday through Friday as trading days on every board.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdayCalendar;

impl BoardCalendar for WeekdayCalendar {
    fn is_trade_date(&self, _security: &SecurityId, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_calendar() {
        let calendar = WeekdayCalendar;
        let security = SecurityId::new("ABC", "X");

        // 2024-01-05 is a Friday, 2024-01-06 a Saturday.
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

        assert!(calendar.is_trade_date(&security, friday));
        assert!(!calendar.is_trade_date(&security, saturday));
        assert!(!calendar.is_trade_date(&security, sunday));
    }
}
