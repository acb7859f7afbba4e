use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tracing::{debug, info};

use tilgungsplan_core::amortization::schedule::{self, LoanParameters};
use tilgungsplan_core::calendar::YearMonth;
use tilgungsplan_core::charts::series;

use crate::input;

/// Loan terms, with the calculator's default values
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Disbursement month (MM.YYYY)
    #[arg(long, default_value = "01.2025")]
    pub disbursement: YearMonth,

    /// Loan amount
    #[arg(long, default_value = "400000")]
    pub principal: Decimal,

    /// Nominal interest rate p.a. in percent
    #[arg(long, default_value = "3.0")]
    pub rate: Decimal,

    /// Fixed-rate period (Sollzinsbindung) in years
    #[arg(long, default_value_t = 10)]
    pub fixation_years: u32,

    /// Monthly installment
    #[arg(long, default_value = "2000")]
    pub installment: Decimal,

    /// Include yearly Sondertilgungen
    #[arg(long)]
    pub sondertilgung: bool,

    /// Amount per Sondertilgung
    #[arg(long, default_value = "5000", requires = "sondertilgung")]
    pub extra_amount: Decimal,

    /// Number of Sondertilgungen
    #[arg(long, default_value_t = 10, requires = "sondertilgung")]
    pub extra_count: u32,

    /// Month of the first Sondertilgung (MM.YYYY)
    #[arg(long, default_value = "01.2026", requires = "sondertilgung")]
    pub extra_start: YearMonth,
}

/// Arguments for schedule generation
#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Which chart series to print
#[derive(Debug, Clone, ValueEnum)]
pub enum ChartSeries {
    /// Remaining balance per row
    Balance,
    /// Interest and principal per installment
    Split,
}

/// Arguments for chart data
#[derive(Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Series to print
    #[arg(long, default_value = "balance")]
    pub series: ChartSeries,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_parameters(&args.loan)?;
    let result = schedule::calculate_tilgungsplan(&params)?;
    info!(
        rows = result.result.periods.len(),
        final_balance = %result.result.summary.final_balance,
        "computed Tilgungsplan"
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_chart(args: ChartArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_parameters(&args.loan)?;
    let schedule = schedule::generate_schedule(&params)?;
    let value = match args.series {
        ChartSeries::Balance => serde_json::to_value(series::balance_series(&schedule))?,
        ChartSeries::Split => serde_json::to_value(series::payment_split_series(&schedule))?,
    };
    Ok(value)
}

/// JSON file, then piped stdin, then flags.
fn resolve_parameters(args: &LoanArgs) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan parameters from file");
        return input::file::read_json(path);
    }
    if let Some(params) = input::stdin::read_stdin()? {
        debug!("read loan parameters from stdin");
        return Ok(params);
    }
    Ok(parameters_from_flags(args))
}

fn parameters_from_flags(args: &LoanArgs) -> LoanParameters {
    let (extra_payment_amount, extra_payment_count) = if args.sondertilgung {
        (args.extra_amount, args.extra_count)
    } else {
        (dec!(0), 0)
    };

    LoanParameters {
        disbursement_month: args.disbursement,
        principal: args.principal,
        annual_rate: args.rate,
        fixation_years: args.fixation_years,
        installment: args.installment,
        extra_payment_amount,
        extra_payment_count,
        extra_payment_start_month: args.extra_start,
    }
}
