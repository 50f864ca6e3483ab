use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_affordability_core::sensitivity::{self, AffordabilitySensitivityInput};
use loan_affordability_core::types::SensitivityVariable;

use crate::input;

/// Arguments for a rate x tenure sweep of the affordable principal
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Monthly expenses
    #[arg(long)]
    pub expenses: Option<Decimal>,

    /// Annual rate sweep in percent, as min:max:step (e.g. "6:12:1")
    #[arg(long)]
    pub rate_range: Option<String>,

    /// Tenure sweep in years, as min:max:step (e.g. "5:30:5")
    #[arg(long)]
    pub tenure_range: Option<String>,

    /// Share of disposable income available for the installment
    #[arg(long)]
    pub installment_ratio: Option<Decimal>,
}

fn parse_range(name: &str, range: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = range.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("--{name}-range must be min:max:step, got '{range}'").into());
    }
    Ok(SensitivityVariable {
        name: name.to_string(),
        min: parts[0].trim().parse()?,
        max: parts[1].trim().parse()?,
        step: parts[2].trim().parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flags_given = args.income.is_some()
        || args.expenses.is_some()
        || args.rate_range.is_some()
        || args.tenure_range.is_some();
    let sens_input: AffordabilitySensitivityInput =
        match input::read_request(args.input.as_deref(), flags_given)? {
            Some(request) => request,
            None => AffordabilitySensitivityInput {
                monthly_income: args
                    .income
                    .ok_or("--income is required (or provide --input)")?,
                monthly_expenses: args
                    .expenses
                    .ok_or("--expenses is required (or provide --input)")?,
                rate: parse_range(
                    "rate",
                    &args
                        .rate_range
                        .ok_or("--rate-range is required (or provide --input)")?,
                )?,
                tenure: parse_range(
                    "tenure",
                    &args
                        .tenure_range
                        .ok_or("--tenure-range is required (or provide --input)")?,
                )?,
                installment_ratio: args.installment_ratio,
            },
        };

    let result = sensitivity::rate_tenure_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
