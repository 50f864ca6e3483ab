use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_affordability_core::affordability::{self, InstallmentInput};

use crate::input;

/// Arguments for the monthly installment (EMI) of a known principal
#[derive(Args)]
pub struct InstallmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan tenure in years
    #[arg(long)]
    pub tenure: Option<Decimal>,
}

pub fn run_installment(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flags_given =
        args.principal.is_some() || args.rate.is_some() || args.tenure.is_some();
    let emi_input: InstallmentInput = match input::read_request(args.input.as_deref(), flags_given)? {
        Some(request) => request,
        None => InstallmentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure_years: args.tenure.ok_or("--tenure is required (or provide --input)")?,
        },
    };

    let result = affordability::calculate_installment(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}
