use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use loan_affordability_core::affordability::{self, AffordabilityPolicy, RawLoanInputs};

use crate::input;

/// Arguments for a loan affordability estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AffordabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<String>,

    /// Monthly expenses, including existing EMIs
    #[arg(long)]
    pub expenses: Option<String>,

    /// Annual interest rate in percent (10 = 10% per year)
    #[arg(long)]
    pub rate: Option<String>,

    /// Loan tenure in years
    #[arg(long)]
    pub tenure: Option<String>,

    /// Share of disposable income available for the installment
    #[arg(long, default_value = "0.4")]
    pub installment_ratio: Decimal,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flags_given = args.income.is_some()
        || args.expenses.is_some()
        || args.rate.is_some()
        || args.tenure.is_some();
    let raw: RawLoanInputs = match input::read_request(args.input.as_deref(), flags_given)? {
        Some(raw) => raw,
        None => RawLoanInputs {
            income: args.income.ok_or("--income is required (or provide --input)")?,
            expenses: args
                .expenses
                .ok_or("--expenses is required (or provide --input)")?,
            rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure: args.tenure.ok_or("--tenure is required (or provide --input)")?,
        },
    };

    let policy = AffordabilityPolicy::with_installment_ratio(args.installment_ratio)?;
    let result = affordability::analyze_raw(&raw, &policy)?;
    info!(
        max_principal = %result.result.max_principal,
        "affordability estimate ready"
    );
    Ok(serde_json::to_value(result)?)
}
