//! Annual lump-sum repayments (Sondertilgungen).
//!
//! A plan pays the same amount once a year, in the same calendar month,
//! starting at a given month. A payment only takes effect when its date
//! coincides with a regular period of the schedule.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;
use crate::types::Money;

/// A series of yearly lump-sum repayments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentPlan {
    /// Amount paid on each event.
    pub amount: Money,
    /// Number of yearly events.
    pub count: u32,
    /// Month of the first event.
    pub start: YearMonth,
}

impl ExtraPaymentPlan {
    /// A plan with no amount or no events never pays anything.
    pub fn is_active(&self) -> bool {
        self.count > 0 && self.amount > Decimal::ZERO
    }

    /// The month-end dates of every event, in order.
    ///
    /// Yields exactly `count` dates for an active plan and none otherwise.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let count = if self.is_active() { self.count } else { 0 };
        (0..count).map_while(move |i| self.start.plus_years(i).map(|ym| ym.month_end()))
    }

    /// Whether an event falls on the period ending at `date`.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        if !self.is_active() || date.month() != self.start.month() {
            return false;
        }
        let offset = i64::from(date.year()) - i64::from(self.start.year());
        (0..i64::from(self.count)).contains(&offset)
            && self
                .start
                .plus_years(offset as u32)
                .map(|ym| ym.month_end() == date)
                .unwrap_or(false)
    }
}
