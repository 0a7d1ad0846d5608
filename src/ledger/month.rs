use super::LedgerError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 9999;

/// Zero-based index of a month name. Matching ignores case and surrounding
/// whitespace but nothing else: abbreviations are rejected.
pub fn month_index(name: &str) -> Result<u32, LedgerError> {
    let wanted = name.trim();
    MONTH_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(wanted))
        .map(|idx| idx as u32)
        .ok_or_else(|| LedgerError::InvalidMonthName(name.to_string()))
}

/// A calendar month as a half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthPeriod {
    pub year: i32,
    /// Zero-based, January is 0.
    pub month0: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthPeriod {
    pub fn new(year: i32, month0: u32) -> Result<Self, LedgerError> {
        if month0 as usize >= MONTH_NAMES.len() {
            return Err(LedgerError::InvalidMonth(month0));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(LedgerError::InvalidYear(year));
        }
        let start = first_of_month(year, month0 + 1).ok_or(LedgerError::InvalidYear(year))?;
        let end = if month0 == 11 {
            first_of_month(year + 1, 1)
        } else {
            first_of_month(year, month0 + 2)
        }
        .ok_or(LedgerError::InvalidYear(year))?;

        Ok(Self {
            year,
            month0,
            start,
            end,
        })
    }

    /// Resolves a human readable month name such as `"January"`.
    pub fn from_name(name: &str, year: i32) -> Result<Self, LedgerError> {
        Self::new(year, month_index(name)?)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

fn first_of_month(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("January", 0)]
    #[test_case("december", 11)]
    #[test_case("  MARCH ", 2)]
    fn resolves_month_names(name: &str, expected: u32) {
        assert_eq!(month_index(name), Ok(expected));
    }

    #[test_case("Jantober")]
    #[test_case("Jan")]
    #[test_case("")]
    fn rejects_unknown_names(name: &str) {
        assert_eq!(month_index(name), Err(LedgerError::InvalidMonthName(name.to_string())));
    }

    #[test]
    fn january_period_bounds() {
        let period = MonthPeriod::from_name("January", 2024).unwrap();
        assert_eq!(period.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(period.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(period.label(), "January 2024");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let period = MonthPeriod::from_name("December", 2023).unwrap();
        assert_eq!(period.end, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn interval_is_half_open() {
        let period = MonthPeriod::from_name("February", 2024).unwrap();
        assert!(period.contains(period.start));
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!period.contains(period.end));
    }

    #[test]
    fn rejects_out_of_range_year() {
        assert_eq!(MonthPeriod::new(12, 0), Err(LedgerError::InvalidYear(12)));
    }

    #[test_case(12)]
    #[test_case(u32::MAX)]
    fn rejects_out_of_range_month_index(month0: u32) {
        assert_eq!(MonthPeriod::new(2024, month0), Err(LedgerError::InvalidMonth(month0)));
    }

    #[test]
    fn accepts_every_valid_month_index() {
        for month0 in 0..12 {
            let period = MonthPeriod::new(2024, month0).unwrap();
            assert_eq!(period.month_name(), MONTH_NAMES[month0 as usize]);
        }
    }
}
