mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::tilgungsplan::{ChartArgs, PlanArgs};

/// Loan amortization schedules with Sondertilgungen
#[derive(Parser)]
#[command(
    name = "tilgung",
    version,
    about = "Loan amortization schedules (Tilgungsplan) with Sondertilgungen",
    long_about = "Computes a month-by-month amortization schedule for a fixed-rate loan: \
                  interest and principal per installment, yearly lump-sum repayments, \
                  and the remaining balance at payoff or at the end of the fixed-rate period."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Tilgungsplan and its totals
    Plan(PlanArgs),
    /// Print the data behind the balance or interest/principal chart
    Chart(ChartArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plan(args) => commands::tilgungsplan::run_plan(args),
        Commands::Chart(args) => commands::tilgungsplan::run_chart(args),
        Commands::Version => {
            println!("tilgung {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
