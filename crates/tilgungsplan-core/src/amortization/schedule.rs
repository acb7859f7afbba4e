//! Month-by-month amortization schedule (Tilgungsplan) for a fixed-rate
//! annuity loan with optional yearly lump-sum repayments.
//!
//! Each month the fixed installment is split into interest on the opening
//! balance and principal. The final payment shrinks to exactly what is left
//! outstanding. Generation stops at payoff or at the end of the fixed-rate
//! period, whichever comes first. All math uses `rust_decimal::Decimal`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::extra_payments::ExtraPaymentPlan;
use crate::calendar::{format_date, next_month_end, YearMonth};
use crate::error::TilgungsplanError;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Rate};
use crate::TilgungsplanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Loan terms for one schedule computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Month the loan is paid out (`MM.YYYY`).
    pub disbursement_month: YearMonth,
    /// Loan amount disbursed.
    pub principal: Money,
    /// Nominal annual interest rate in percent (3.0 = 3% p.a.).
    pub annual_rate: Rate,
    /// Fixed-rate period (Sollzinsbindung) in years.
    pub fixation_years: u32,
    /// Fixed monthly installment.
    pub installment: Money,
    /// Lump-sum amount per Sondertilgung; zero disables them.
    pub extra_payment_amount: Money,
    /// Number of yearly Sondertilgungen.
    pub extra_payment_count: u32,
    /// Month of the first Sondertilgung (`MM.YYYY`).
    pub extra_payment_start_month: YearMonth,
}

impl LoanParameters {
    pub fn extra_payment_plan(&self) -> ExtraPaymentPlan {
        ExtraPaymentPlan {
            amount: self.extra_payment_amount,
            count: self.extra_payment_count,
            start: self.extra_payment_start_month,
        }
    }

    /// Monthly interest rate: annual percentage / 100 / 12, not compounded.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / PERCENT / MONTHS_PER_YEAR
    }
}

/// What a schedule row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// Synthetic first row at the disbursement date.
    Disbursement,
    /// A regular monthly installment.
    Installment,
    /// A lump-sum repayment.
    ExtraPayment,
}

/// One row of the schedule. Money columns are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Last calendar day of the period's month.
    pub date: NaiveDate,
    pub kind: PeriodKind,
    /// Installment paid; absent on lump-sum rows.
    pub installment: Option<Money>,
    /// Interest portion (Zinsanteil); absent on lump-sum rows.
    pub interest: Option<Money>,
    /// Principal portion (Tilgungsanteil), or the lump-sum amount.
    pub principal: Money,
    /// Remaining balance (Restschuld) after this row.
    pub balance: Money,
}

impl Period {
    fn disbursement(date: NaiveDate, principal: Money) -> Self {
        Period {
            date,
            kind: PeriodKind::Disbursement,
            installment: Some(Decimal::ZERO),
            interest: Some(Decimal::ZERO),
            principal: Decimal::ZERO,
            balance: round_cents(principal),
        }
    }

    fn installment(
        date: NaiveDate,
        installment: Money,
        interest: Money,
        principal: Money,
        balance: Money,
    ) -> Self {
        Period {
            date,
            kind: PeriodKind::Installment,
            installment: Some(round_cents(installment)),
            interest: Some(round_cents(interest)),
            principal: round_cents(principal),
            balance: round_cents(balance),
        }
    }

    fn extra_payment(date: NaiveDate, amount: Money, balance: Money) -> Self {
        Period {
            date,
            kind: PeriodKind::ExtraPayment,
            installment: None,
            interest: None,
            principal: round_cents(amount),
            balance: round_cents(balance),
        }
    }

    /// Row date as `DD.MM.YYYY`.
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }

    pub fn is_extra_payment(&self) -> bool {
        self.kind == PeriodKind::ExtraPayment
    }
}

/// Aggregate figures of a generated schedule, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Sum of all recorded installments (lump sums excluded).
    pub total_installments: Money,
    /// Sum of all interest portions.
    pub total_interest: Money,
    /// Sum of the principal portions of regular installments.
    pub total_principal: Money,
    /// Sum of lump-sum repayments actually applied.
    pub total_extra_payments: Money,
    /// Balance left after the last period, tracked independently of the rows.
    pub final_balance: Money,
    /// Working installment after generation; differs from the nominal one
    /// when the last payment was reduced to pay the loan off.
    pub monthly_installment: Money,
    /// `monthly_installment * 12`.
    pub annual_installment: Money,
    /// Number of regular installment rows.
    pub installment_count: u32,
    /// Number of lump-sum rows.
    pub extra_payments_applied: u32,
    /// Generation stopped because the balance grew past the range of
    /// `Decimal`; only possible when the installment never covers the interest.
    #[serde(default)]
    pub truncated: bool,
    /// Date of the final installment if the loan was paid off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

/// A generated Tilgungsplan: ordered rows plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub periods: Vec<Period>,
    pub summary: ScheduleSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the amortization schedule for `params`.
///
/// Row 0 is the disbursement row. Each following month adds one installment
/// row, preceded by a lump-sum row when a Sondertilgung falls on that month.
/// Runs for at most `fixation_years * 12` months and stops as soon as the
/// balance reaches zero.
pub fn generate_schedule(params: &LoanParameters) -> TilgungsplanResult<Schedule> {
    validate_parameters(params)?;

    let monthly_rate = params.monthly_rate();
    let plan = params.extra_payment_plan();
    let max_months = params.fixation_years.saturating_mul(12);

    let disbursement_date = params.disbursement_month.month_end();
    let mut periods = vec![Period::disbursement(disbursement_date, params.principal)];

    let mut balance = params.principal;
    // Keeps the final-row adjustment once made; reported as
    // `ScheduleSummary::monthly_installment`.
    let mut installment = params.installment;

    let mut total_installments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_extra_payments = Decimal::ZERO;
    let mut installment_count: u32 = 0;
    let mut extra_payments_applied: u32 = 0;
    let mut last_date = disbursement_date;
    let mut truncated = false;

    let mut current_date = next_month_end(disbursement_date);

    for _ in 0..max_months {
        if balance <= Decimal::ZERO {
            break;
        }
        // Only None at the very end of chrono's calendar.
        let Some(date) = current_date else {
            break;
        };

        let Some(step) = amortize_month(balance, installment, monthly_rate) else {
            warn!(date = %date, balance = %balance, "balance left the decimal range, stopping");
            truncated = true;
            break;
        };
        let MonthStep {
            interest,
            principal: principal_due,
            installment: paid,
            balance: closing,
        } = step;
        installment = paid;
        balance = closing;

        if plan.is_due(date) {
            let applied = plan.amount.min(balance.max(Decimal::ZERO));
            if applied > Decimal::ZERO {
                balance -= applied;
                total_extra_payments += applied;
                extra_payments_applied += 1;
                debug!(date = %date, amount = %applied, balance = %balance, "applied Sondertilgung");
                periods.push(Period::extra_payment(date, applied, balance));
            }
        }

        total_interest = total_interest.saturating_add(interest);
        total_principal = total_principal.saturating_add(principal_due);
        total_installments = total_installments.saturating_add(installment);
        installment_count += 1;

        periods.push(Period::installment(
            date,
            installment,
            interest,
            principal_due,
            balance,
        ));

        last_date = date;
        current_date = next_month_end(date);
    }

    correct_balances(&mut periods);

    let paid_off = balance <= Decimal::ZERO;
    debug!(
        rows = periods.len(),
        installments = installment_count,
        final_balance = %balance,
        paid_off,
        "schedule generated"
    );

    let summary = ScheduleSummary {
        total_installments: round_cents(total_installments),
        total_interest: round_cents(total_interest),
        total_principal: round_cents(total_principal),
        total_extra_payments: round_cents(total_extra_payments),
        final_balance: round_cents(balance),
        monthly_installment: round_cents(installment),
        annual_installment: round_cents(installment.saturating_mul(MONTHS_PER_YEAR)),
        installment_count,
        extra_payments_applied,
        truncated,
        payoff_date: if paid_off && installment_count > 0 {
            Some(last_date)
        } else {
            None
        },
    };

    Ok(Schedule { periods, summary })
}

/// Rewrite every row's balance from the row order, anchored on row 0:
/// `balance[i] = balance[i-1] - principal[i]`, floored at zero.
///
/// Subtracting the previous row's principal (`principal[i-1]`) instead
/// shows every balance one row late: row 1 would still read the full loan
/// amount and each lump sum would land on the row after it. Each row here
/// shows the balance after its own principal.
///
/// Runs over the finished sequence because lump-sum rows are inserted ahead
/// of the installment row they were computed after.
pub fn correct_balances(periods: &mut [Period]) {
    for i in 1..periods.len() {
        let corrected = periods[i - 1].balance.saturating_sub(periods[i].principal);
        periods[i].balance = corrected.max(Decimal::ZERO);
    }
}

/// Result of one regular month.
struct MonthStep {
    interest: Money,
    principal: Money,
    installment: Money,
    balance: Money,
}

/// Split one installment into interest and principal. The installment
/// shrinks when it would overshoot the balance. None when the arithmetic
/// leaves the `Decimal` range.
fn amortize_month(balance: Money, installment: Money, monthly_rate: Rate) -> Option<MonthStep> {
    let interest = balance.checked_mul(monthly_rate)?;
    let mut principal = installment.checked_sub(interest)?;
    let mut installment = installment;

    if principal > balance {
        principal = balance;
        installment = interest.checked_add(principal)?;
    }

    Some(MonthStep {
        interest,
        principal,
        installment,
        balance: balance.checked_sub(principal)?,
    })
}

/// Generate a schedule wrapped in the standard output envelope, with
/// warnings for inputs that lead to unusual schedules.
pub fn calculate_tilgungsplan(
    params: &LoanParameters,
) -> TilgungsplanResult<ComputationOutput<Schedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = generate_schedule(params)?;
    let summary = &schedule.summary;

    match params.principal.checked_mul(params.monthly_rate()) {
        Some(first_interest) if params.installment > first_interest => {}
        Some(first_interest) => warnings.push(format!(
            "Installment {} does not exceed the first month's interest {}; the balance will not decrease",
            params.installment,
            round_cents(first_interest)
        )),
        None => warnings.push(format!(
            "Installment {} does not cover the first month's interest; the balance will not decrease",
            params.installment
        )),
    }

    if summary.truncated {
        warnings.push(format!(
            "Schedule stopped after {} installments: the balance grew beyond the representable range",
            summary.installment_count
        ));
    }

    let plan = params.extra_payment_plan();
    if plan.is_active() {
        let scheduled = plan.dates().count() as u32;
        let not_applied = scheduled.saturating_sub(summary.extra_payments_applied);
        if not_applied > 0 {
            warnings.push(format!(
                "{not_applied} of {scheduled} Sondertilgungen fall outside the generated schedule and were not applied"
            ));
        }
        let clamped = schedule
            .periods
            .iter()
            .any(|p| p.is_extra_payment() && p.principal < round_cents(plan.amount));
        if clamped {
            warnings.push(
                "A Sondertilgung exceeded the remaining balance and was reduced to pay off the loan"
                    .into(),
            );
        }
    }

    if summary.final_balance > Decimal::ZERO {
        warnings.push(format!(
            "Remaining balance of {} is outstanding at the end of the {}-year fixed-rate period",
            summary.final_balance, params.fixation_years
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity amortization — monthly installments, simple monthly rate (p.a. / 12), yearly Sondertilgungen",
        &serde_json::json!({
            "disbursement_month": params.disbursement_month.to_string(),
            "principal": params.principal.to_string(),
            "annual_rate_pct": params.annual_rate.to_string(),
            "monthly_rate": params.monthly_rate().normalize().to_string(),
            "fixation_years": params.fixation_years,
            "installment": params.installment.to_string(),
            "extra_payment_amount": params.extra_payment_amount.to_string(),
            "extra_payment_count": params.extra_payment_count,
            "extra_payment_start_month": params.extra_payment_start_month.to_string(),
        }),
        warnings,
        elapsed,
        schedule,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_parameters(params: &LoanParameters) -> TilgungsplanResult<()> {
    if params.principal <= Decimal::ZERO {
        return Err(TilgungsplanError::InvalidParameter {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if params.annual_rate < Decimal::ZERO {
        return Err(TilgungsplanError::InvalidParameter {
            field: "annual_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if params.fixation_years == 0 {
        return Err(TilgungsplanError::InvalidParameter {
            field: "fixation_years".into(),
            reason: "Fixed-rate period must be at least 1 year".into(),
        });
    }
    if params.installment <= Decimal::ZERO {
        return Err(TilgungsplanError::InvalidParameter {
            field: "installment".into(),
            reason: "Installment must be positive".into(),
        });
    }
    if params.extra_payment_amount < Decimal::ZERO {
        return Err(TilgungsplanError::InvalidParameter {
            field: "extra_payment_amount".into(),
            reason: "Sondertilgung amount cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// The calculator's default form values, without Sondertilgungen.
    fn default_loan() -> LoanParameters {
        LoanParameters {
            disbursement_month: "01.2025".parse().unwrap(),
            principal: dec!(400000),
            annual_rate: dec!(3.0),
            fixation_years: 10,
            installment: dec!(2000),
            extra_payment_amount: dec!(0),
            extra_payment_count: 0,
            extra_payment_start_month: "01.2026".parse().unwrap(),
        }
    }

    /// Interest-free loan, easy to follow by hand.
    fn zero_rate_loan() -> LoanParameters {
        LoanParameters {
            principal: dec!(10000),
            annual_rate: dec!(0),
            fixation_years: 1,
            installment: dec!(3000),
            ..default_loan()
        }
    }

    #[test]
    fn test_first_rows_of_default_loan() {
        let schedule = generate_schedule(&default_loan()).unwrap();
        let rows = &schedule.periods;

        assert_eq!(rows[0].date, ymd(2025, 1, 31));
        assert_eq!(rows[0].kind, PeriodKind::Disbursement);
        assert_eq!(rows[0].balance, dec!(400000.00));
        assert_eq!(rows[0].principal, Decimal::ZERO);

        assert_eq!(rows[1].date, ymd(2025, 2, 28));
        assert_eq!(rows[1].installment, Some(dec!(2000)));
        assert_eq!(rows[1].interest, Some(dec!(1000.00)));
        assert_eq!(rows[1].principal, dec!(1000.00));
        assert_eq!(rows[1].balance, dec!(399000.00));

        // 399000 * 0.0025 = 997.50
        assert_eq!(rows[2].date, ymd(2025, 3, 31));
        assert_eq!(rows[2].interest, Some(dec!(997.50)));
        assert_eq!(rows[2].principal, dec!(1002.50));
        assert_eq!(rows[2].balance, dec!(397997.50));
    }

    #[test]
    fn test_runs_full_fixation_period_when_not_paid_off() {
        let schedule = generate_schedule(&default_loan()).unwrap();
        assert_eq!(schedule.periods.len(), 121);
        assert_eq!(schedule.summary.installment_count, 120);
        assert_eq!(schedule.summary.total_installments, dec!(240000));
        assert_eq!(schedule.summary.payoff_date, None);
        assert!(schedule.summary.final_balance > Decimal::ZERO);
        assert_eq!(schedule.periods.last().unwrap().date, ymd(2035, 1, 31));
    }

    #[test]
    fn test_stops_early_at_payoff() {
        let schedule = generate_schedule(&zero_rate_loan()).unwrap();
        let rows = &schedule.periods;

        // 3000, 3000, 3000, then the last 1000
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4].date, ymd(2025, 5, 31));
        assert_eq!(rows[4].installment, Some(dec!(1000)));
        assert_eq!(rows[4].principal, dec!(1000));
        assert_eq!(rows[4].balance, Decimal::ZERO);
        assert_eq!(schedule.summary.final_balance, Decimal::ZERO);
        assert_eq!(schedule.summary.total_installments, dec!(10000));
        assert_eq!(schedule.summary.payoff_date, Some(ymd(2025, 5, 31)));
    }

    #[test]
    fn test_final_installment_is_interest_plus_remaining_principal() {
        // 1% per month: row 1 interest 10, principal 590 -> 410 left;
        // row 2 interest 4.10, principal capped at 410.
        let params = LoanParameters {
            principal: dec!(1000),
            annual_rate: dec!(12),
            installment: dec!(600),
            fixation_years: 1,
            ..default_loan()
        };
        let schedule = generate_schedule(&params).unwrap();
        let last = schedule.periods.last().unwrap();

        assert_eq!(schedule.periods.len(), 3);
        assert_eq!(last.interest, Some(dec!(4.10)));
        assert_eq!(last.principal, dec!(410));
        assert_eq!(last.installment, Some(dec!(414.10)));
        assert_eq!(schedule.summary.total_installments, dec!(1014.10));
        assert_eq!(schedule.summary.total_interest, dec!(14.10));
        assert_eq!(schedule.summary.total_principal, dec!(1000));
    }

    #[test]
    fn test_adjusted_installment_persists_into_summary() {
        // The reduced final installment stays in the working variable and is
        // what the summary reports as the monthly installment.
        let schedule = generate_schedule(&zero_rate_loan()).unwrap();
        assert_eq!(schedule.summary.monthly_installment, dec!(1000));
        assert_eq!(schedule.summary.annual_installment, dec!(12000));
    }

    #[test]
    fn test_extra_payment_row_precedes_installment_row() {
        let params = LoanParameters {
            extra_payment_amount: dec!(5000),
            extra_payment_count: 1,
            extra_payment_start_month: "01.2026".parse().unwrap(),
            ..default_loan()
        };
        let schedule = generate_schedule(&params).unwrap();
        let rows = &schedule.periods;

        // Feb..Dec 2025 are rows 1..=11
        let extra = &rows[12];
        assert_eq!(extra.kind, PeriodKind::ExtraPayment);
        assert_eq!(extra.date, ymd(2026, 1, 31));
        assert_eq!(extra.installment, None);
        assert_eq!(extra.interest, None);
        assert_eq!(extra.principal, dec!(5000.00));
        assert_eq!(extra.balance, rows[11].balance - dec!(5000));

        let regular = &rows[13];
        assert_eq!(regular.kind, PeriodKind::Installment);
        assert_eq!(regular.date, ymd(2026, 1, 31));
        assert_eq!(regular.balance, extra.balance - regular.principal);

        assert_eq!(schedule.summary.extra_payments_applied, 1);
        assert_eq!(schedule.summary.total_extra_payments, dec!(5000));
        // Lump sums never count as installments.
        assert_eq!(schedule.summary.total_installments, dec!(240000));
    }

    #[test]
    fn test_extra_payment_clamped_to_remaining_balance() {
        let params = LoanParameters {
            installment: dec!(1000),
            extra_payment_amount: dec!(20000),
            extra_payment_count: 1,
            extra_payment_start_month: "03.2025".parse().unwrap(),
            ..zero_rate_loan()
        };
        let schedule = generate_schedule(&params).unwrap();
        let rows = &schedule.periods;

        // Feb: 1000 -> 9000; Mar: 1000 -> 8000, then the lump sum pays 8000.
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].kind, PeriodKind::ExtraPayment);
        assert_eq!(rows[2].principal, dec!(8000));
        assert_eq!(rows[2].balance, dec!(1000));
        assert_eq!(rows[3].balance, Decimal::ZERO);
        assert_eq!(schedule.summary.final_balance, Decimal::ZERO);
        assert_eq!(schedule.summary.total_extra_payments, dec!(8000));
        assert_eq!(schedule.summary.total_principal, dec!(2000));
    }

    #[test]
    fn test_no_extra_payment_row_after_installment_pays_off() {
        // May's installment is cut to the last 1000 and clears the loan, so the
        // lump sum due that month has nothing left to repay.
        let params = LoanParameters {
            extra_payment_amount: dec!(5000),
            extra_payment_count: 1,
            extra_payment_start_month: "05.2025".parse().unwrap(),
            ..zero_rate_loan()
        };
        let out = calculate_tilgungsplan(&params).unwrap();
        let rows = &out.result.periods;

        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|p| !p.is_extra_payment()));
        assert_eq!(rows[4].date, ymd(2025, 5, 31));
        assert_eq!(rows[4].kind, PeriodKind::Installment);
        assert_eq!(rows[4].balance, Decimal::ZERO);
        assert_eq!(out.result.summary.extra_payments_applied, 0);
        assert_eq!(out.result.summary.total_extra_payments, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.starts_with("1 of 1")));
    }

    #[test]
    fn test_insufficient_installment_grows_balance() {
        let params = LoanParameters {
            installment: dec!(500),
            fixation_years: 1,
            ..default_loan()
        };
        let schedule = generate_schedule(&params).unwrap();
        let rows = &schedule.periods;

        assert_eq!(rows[1].interest, Some(dec!(1000)));
        assert_eq!(rows[1].principal, dec!(-500));
        assert_eq!(rows[1].balance, dec!(400500));
        assert!(rows[12].balance > rows[1].balance);
        assert_eq!(schedule.summary.installment_count, 12);
    }

    #[test]
    fn test_runaway_balance_stops_before_decimal_overflow() {
        // 1000% p.a. grows the balance by 83% a month; it passes the Decimal
        // range well inside the 120 months of the fixed-rate period.
        let params = LoanParameters {
            annual_rate: dec!(1000),
            installment: dec!(1),
            ..default_loan()
        };
        let schedule = generate_schedule(&params).unwrap();
        let summary = &schedule.summary;

        assert!(summary.truncated);
        assert!(summary.installment_count > 0 && summary.installment_count < 120);
        assert_eq!(schedule.periods.len() as u32, summary.installment_count + 1);
        assert_eq!(summary.payoff_date, None);
        assert!(summary.final_balance > Decimal::from_i128_with_scale(10_i128.pow(27), 0));
        assert!(schedule
            .periods
            .windows(2)
            .all(|pair| pair[1].balance >= pair[0].balance));
    }

    #[test]
    fn test_long_non_amortizing_loan_stops_before_decimal_overflow() {
        // 0.25% a month on 400000 takes about 21500 months to leave the range.
        let params = LoanParameters {
            installment: dec!(1),
            fixation_years: 2000,
            ..default_loan()
        };
        let schedule = generate_schedule(&params).unwrap();

        assert!(schedule.summary.truncated);
        assert!((20_000..24_000).contains(&schedule.summary.installment_count));
    }

    #[test]
    fn test_regular_schedule_is_not_truncated() {
        assert!(!generate_schedule(&default_loan()).unwrap().summary.truncated);
        assert!(!generate_schedule(&zero_rate_loan()).unwrap().summary.truncated);
    }

    #[test]
    fn test_correct_balances_uses_row_order() {
        let d = ymd(2025, 1, 31);
        let mut rows = vec![
            Period::disbursement(d, dec!(100)),
            Period::extra_payment(d, dec!(30), dec!(999)),
            Period::installment(d, dec!(15), dec!(5), dec!(10), dec!(999)),
            Period::installment(d, dec!(80), dec!(0), dec!(80), dec!(999)),
        ];
        correct_balances(&mut rows);
        let balances: Vec<Money> = rows.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec!(100), dec!(70), dec!(60), dec!(0)]);
    }

    #[test]
    fn test_validation_errors() {
        let cases: Vec<(LoanParameters, &str)> = vec![
            (LoanParameters { principal: dec!(0), ..default_loan() }, "principal"),
            (LoanParameters { annual_rate: dec!(-0.1), ..default_loan() }, "annual_rate"),
            (LoanParameters { fixation_years: 0, ..default_loan() }, "fixation_years"),
            (LoanParameters { installment: dec!(0), ..default_loan() }, "installment"),
            (
                LoanParameters { extra_payment_amount: dec!(-1), ..default_loan() },
                "extra_payment_amount",
            ),
        ];
        for (params, expected_field) in cases {
            match generate_schedule(&params) {
                Err(TilgungsplanError::InvalidParameter { field, .. }) => {
                    assert_eq!(field, expected_field)
                }
                other => panic!("expected InvalidParameter for {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_envelope_warns_on_outstanding_balance() {
        let out = calculate_tilgungsplan(&default_loan()).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("outstanding at the end of the 10-year")));
        assert_eq!(out.assumptions["monthly_rate"], "0.0025");
    }

    #[test]
    fn test_envelope_warns_on_unapplied_extra_payments() {
        let params = LoanParameters {
            extra_payment_amount: dec!(5000),
            extra_payment_count: 15,
            ..default_loan()
        };
        let out = calculate_tilgungsplan(&params).unwrap();
        assert_eq!(out.result.summary.extra_payments_applied, 10);
        assert!(out.warnings.iter().any(|w| w.starts_with("5 of 15")));
    }

    #[test]
    fn test_envelope_warns_on_non_amortizing_installment() {
        let params = LoanParameters {
            installment: dec!(1000),
            ..default_loan()
        };
        let out = calculate_tilgungsplan(&params).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("does not exceed the first month's interest")));
    }

    #[test]
    fn test_envelope_warns_when_schedule_stops_early() {
        let params = LoanParameters {
            annual_rate: dec!(1000),
            installment: dec!(1),
            ..default_loan()
        };
        let out = calculate_tilgungsplan(&params).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("grew beyond the representable range")));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("does not exceed the first month's interest")));
    }

    #[test]
    fn test_envelope_clean_for_paid_off_loan() {
        let out = calculate_tilgungsplan(&zero_rate_loan()).unwrap();
        assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);
    }
}
