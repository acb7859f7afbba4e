//! Time series behind the two schedule charts: remaining balance over time,
//! and the interest/principal split of each installment over time.
//!
//! Only the data is produced here; plotting is left to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::Schedule;
use crate::types::Money;

/// One point of the balance (Restschuld) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub balance: Money,
}

/// One point of the interest/principal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplitPoint {
    pub date: NaiveDate,
    pub interest: Money,
    pub principal: Money,
}

/// Balance after every row, lump-sum rows included.
pub fn balance_series(schedule: &Schedule) -> Vec<BalancePoint> {
    schedule
        .periods
        .iter()
        .map(|p| BalancePoint {
            date: p.date,
            balance: p.balance,
        })
        .collect()
}

/// Interest and principal of every row that carries a numeric installment.
///
/// Lump-sum rows have no installment and are left out, so a Sondertilgung
/// does not show up as a spike in the principal line.
pub fn payment_split_series(schedule: &Schedule) -> Vec<PaymentSplitPoint> {
    schedule
        .periods
        .iter()
        .filter_map(|p| match (p.installment, p.interest) {
            (Some(_), Some(interest)) => Some(PaymentSplitPoint {
                date: p.date,
                interest,
                principal: p.principal,
            }),
            _ => None,
        })
        .collect()
}
