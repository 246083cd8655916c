use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, rendered as `YYYY-MM`.
///
/// Ordering is chronological, so month keys can be compared and sorted
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(today())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.shift(1)
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    /// Move by a signed number of months, wrapping across years.
    pub fn shift(&self, months: i32) -> Self {
        let total_months = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: total_months.div_euclid(12),
            month: (total_months.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid month '{}', expected YYYY-MM", s);

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for YearMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for YearMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// The same day-of-month in the previous month, clamped to that month's
/// last day when it is shorter (March 31 maps to the end of February).
pub fn same_day_previous_month(date: NaiveDate) -> NaiveDate {
    let prev = YearMonth::of(date).prev();
    NaiveDate::from_ymd_opt(prev.year, prev.month, date.day()).unwrap_or_else(|| prev.last_day())
}

/// Short "Mon DD" label used by the month-over-month comparison.
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        let ym: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(ym.year(), 2024);
        assert_eq!(ym.month(), 3);
        assert_eq!(ym.to_string(), "2024-03");

        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-3".parse::<YearMonth>().is_err());
        assert!("2024/03".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_shift_wraps_years() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.prev(), YearMonth::new(2023, 12).unwrap());
        assert_eq!(jan.shift(-13), YearMonth::new(2022, 12).unwrap());
        assert_eq!(YearMonth::new(2023, 12).unwrap().shift(1), jan);
    }

    #[test]
    fn test_month_bounds() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert_eq!(YearMonth::new(2023, 12).unwrap().last_day(), date(2023, 12, 31));
        assert_eq!(YearMonth::of(date(2024, 2, 29)), feb);
        assert_eq!(YearMonth::of(date(2024, 3, 1)), feb.shift(1));
    }

    #[test]
    fn test_same_day_previous_month_clamps() {
        assert_eq!(same_day_previous_month(date(2024, 3, 31)), date(2024, 2, 29));
        assert_eq!(same_day_previous_month(date(2023, 3, 30)), date(2023, 2, 28));
        assert_eq!(same_day_previous_month(date(2024, 1, 15)), date(2023, 12, 15));
        assert_eq!(same_day_previous_month(date(2024, 5, 31)), date(2024, 4, 30));
    }

    #[test]
    fn test_serde_as_string() {
        let ym = YearMonth::new(2024, 7).unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2024-07\"");
        let back: YearMonth = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, ym);
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label(date(2024, 2, 29)), "Feb 29");
    }
}
