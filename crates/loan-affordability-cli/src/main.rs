mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::affordability::AffordabilityArgs;
use commands::installment::InstallmentArgs;
use commands::sensitivity::SensitivityArgs;

/// Household loan affordability estimates
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Household loan affordability estimates",
    long_about = "Estimate the largest monthly installment (EMI) a household can \
                  afford from its income and expenses, and the loan principal that \
                  installment services at a given rate and tenure. All money math \
                  uses decimal precision and half-up rounding to the cent."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the maximum affordable installment and loan principal
    Affordability(AffordabilityArgs),
    /// Monthly installment (EMI) for a known loan principal
    Installment(InstallmentArgs),
    /// Sweep rate and tenure to see how the affordable principal moves
    Sensitivity(SensitivityArgs),
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

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Installment(args) => commands::installment::run_installment(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
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
