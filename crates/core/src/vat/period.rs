//! Calendar month bounds for VAT aggregation.

use chrono::NaiveDate;

use super::error::VatError;

/// Returns `[first day of month, first day of next month)`.
///
/// The upper bound is exclusive so every day of the month is covered,
/// including the 29th-31st.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), VatError> {
    let invalid = || VatError::InvalidPeriod { year, month };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_regular_month() {
        assert_eq!(month_bounds(2025, 1).unwrap(), (date(2025, 1, 1), date(2025, 2, 1)));
    }

    #[test]
    fn test_december_rolls_over() {
        assert_eq!(month_bounds(2025, 12).unwrap(), (date(2025, 12, 1), date(2026, 1, 1)));
    }

    #[test]
    fn test_last_day_is_inside() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        let leap_day = date(2024, 2, 29);
        assert!(leap_day >= start && leap_day < end);
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(
            month_bounds(2025, 13),
            Err(VatError::InvalidPeriod { year: 2025, month: 13 })
        );
        assert!(month_bounds(2025, 0).is_err());
    }
}
