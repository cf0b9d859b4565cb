/*!
Miscellaneous utilities for `closecast`
*/

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Whether a date falls on a weekday. No holiday calendar is applied.
#[inline]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// An endless iterator over the business days strictly after `date`
pub fn business_days_after(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (1..)
        .map(move |days| date + Duration::days(days))
        .filter(|date| is_business_day(*date))
}

/// The `n` business days following `date`
pub fn next_business_days(date: NaiveDate, n: usize) -> Vec<NaiveDate> {
    business_days_after(date).take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_business_days() {
        // Thursday
        assert_eq!(
            next_business_days(ymd(2024, 2, 29), 5),
            vec![
                ymd(2024, 3, 1),
                ymd(2024, 3, 4),
                ymd(2024, 3, 5),
                ymd(2024, 3, 6),
                ymd(2024, 3, 7)
            ]
        );
        // Saturday
        assert_eq!(
            next_business_days(ymd(2024, 3, 2), 2),
            vec![ymd(2024, 3, 4), ymd(2024, 3, 5)]
        );
        assert!(next_business_days(ymd(2024, 3, 2), 0).is_empty());
    }
}
