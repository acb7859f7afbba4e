//! Month/year handling for monthly schedules.
//!
//! Every period in a Tilgungsplan ends on the last calendar day of its month,
//! so the only date input the generator needs is a month/year pair, written
//! `MM.YYYY` on every textual surface.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TilgungsplanError;
use crate::TilgungsplanResult;

/// Display format for period dates (`31.01.2025`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// A calendar month, parsed from and rendered as `MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> TilgungsplanResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TilgungsplanError::InvalidDateFormat {
                input: format!("{month:02}.{year:04}"),
                reason: "Month must be between 01 and 12".into(),
            });
        }
        if !(1..=9999).contains(&year) {
            return Err(TilgungsplanError::InvalidDateFormat {
                input: format!("{month:02}.{year:04}"),
                reason: "Year must be between 0001 and 9999".into(),
            });
        }
        Ok(YearMonth { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Last calendar day of this month.
    pub fn month_end(&self) -> NaiveDate {
        // year is bounded to 1..=9999, well inside chrono's range
        month_end(self.year, self.month).unwrap_or(NaiveDate::MAX)
    }

    /// Same calendar month, `years` later; None past year 9999.
    pub fn plus_years(&self, years: u32) -> Option<YearMonth> {
        let year = self.year.checked_add(i32::try_from(years).ok()?)?;
        YearMonth::new(year, self.month).ok()
    }
}

impl FromStr for YearMonth {
    type Err = TilgungsplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TilgungsplanError::InvalidDateFormat {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (month_part, year_part) = s
            .split_once('.')
            .ok_or_else(|| invalid("Expected MM.YYYY"))?;

        if month_part.len() != 2 || year_part.len() != 4 {
            return Err(invalid("Expected a two-digit month and a four-digit year (MM.YYYY)"));
        }
        if !month_part.bytes().all(|b| b.is_ascii_digit())
            || !year_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("Month and year must be numeric"));
        }

        let month: u32 = month_part.parse().map_err(|_| invalid("Unparsable month"))?;
        let year: i32 = year_part.parse().map_err(|_| invalid("Unparsable year"))?;

        YearMonth::new(year, month).map_err(|e| match e {
            TilgungsplanError::InvalidDateFormat { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:04}", self.month, self.year)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = TilgungsplanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Last calendar day of `month` in `year`, or None outside chrono's range.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    end_of_month(NaiveDate::from_ymd_opt(year, month, 1)?)
}

/// Last calendar day of the month following `date`.
pub fn next_month_end(date: NaiveDate) -> Option<NaiveDate> {
    let next_first = date.with_day(1)?.checked_add_months(Months::new(1))?;
    end_of_month(next_first)
}

fn end_of_month(first_of_month: NaiveDate) -> Option<NaiveDate> {
    first_of_month.checked_add_months(Months::new(1))?.pred_opt()
}

/// Format a period date as `DD.MM.YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
