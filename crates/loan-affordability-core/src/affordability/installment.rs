use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{monthly_rate, tenure_periods};
use crate::error::{CalculationError, ValidationError};
use crate::time_value::{annuity_payment, round_currency};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Periods, Years};
use crate::AffordabilityResult;

/// A loan whose level monthly installment (EMI) is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_years: Years,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentOutput {
    pub monthly_installment: Money,
    pub periods: Periods,
    pub total_repayment: Money,
    pub total_interest: Money,
}

/// EMI for a known principal: the forward direction of the affordability
/// inversion.
pub fn calculate_installment(
    input: &InstallmentInput,
) -> AffordabilityResult<ComputationOutput<InstallmentOutput>> {
    let start = Instant::now();

    if input.principal < Decimal::ZERO {
        return Err(ValidationError::OutOfRange {
            field: "principal".into(),
            reason: format!("{} is negative", input.principal),
        }
        .into());
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(CalculationError::InvalidRate {
            rate: format!("{}% per year", input.annual_rate_percent),
        }
        .into());
    }

    let periods = tenure_periods(input.tenure_years)?.normalize();
    let payment = annuity_payment(monthly_rate(input.annual_rate_percent), periods, input.principal)?;

    let monthly_installment = round_currency(payment);
    let total_repayment = round_currency(payment.checked_mul(periods).ok_or_else(|| {
        CalculationError::Overflow {
            context: "total repayment".into(),
        }
    })?);
    let total_interest =
        round_currency((total_repayment - round_currency(input.principal)).max(Decimal::ZERO));

    let output = InstallmentOutput {
        monthly_installment,
        periods,
        total_repayment,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "principal": input.principal.to_string(),
        "annual_rate_percent": input.annual_rate_percent.to_string(),
        "tenure_years": input.tenure_years.to_string(),
    });

    Ok(with_metadata(
        "Level monthly installment (annuity payment)",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}
