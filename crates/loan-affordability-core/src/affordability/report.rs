use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{
    compute_affordability_with_policy, disposable_income, monthly_rate, tenure_periods,
    AffordabilityPolicy, LoanEstimate, LoanInputs,
};
use super::normalizer::{normalize, RawLoanInputs};
use crate::error::CalculationError;
use crate::time_value::round_currency;
use crate::types::{with_metadata, ComputationOutput, Money, Periods, Rate};
use crate::AffordabilityResult;

const RATE_DISPLAY_DP: u32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Presentation-ready affordability result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub max_monthly_installment: Money,
    pub max_principal: Money,
    /// Income minus expenses, before any loan payment. May be negative.
    pub disposable_income: Money,
    pub monthly_rate: Rate,
    pub periods: Periods,
    /// Installment paid every period over the full tenure.
    pub total_repayment: Money,
    pub total_interest: Money,
    pub summary: String,
}

impl AffordabilityReport {
    pub fn estimate(&self) -> LoanEstimate {
        LoanEstimate {
            max_monthly_installment: self.max_monthly_installment,
            max_principal: self.max_principal,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize raw form input, then run [`analyze_affordability`].
pub fn analyze_raw(
    raw: &RawLoanInputs,
    policy: &AffordabilityPolicy,
) -> AffordabilityResult<ComputationOutput<AffordabilityReport>> {
    let inputs = normalize(raw)?;
    analyze_affordability(&inputs, policy)
}

/// Compute the affordability estimate and wrap it with repayment totals,
/// a results sentence and warnings.
pub fn analyze_affordability(
    inputs: &LoanInputs,
    policy: &AffordabilityPolicy,
) -> AffordabilityResult<ComputationOutput<AffordabilityReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let estimate = compute_affordability_with_policy(inputs, policy)?;
    let disposable = disposable_income(inputs)?;
    let rate = monthly_rate(inputs.annual_rate_percent);
    let periods = tenure_periods(inputs.tenure_years)?.normalize();

    if disposable <= Decimal::ZERO {
        warnings.push(
            "Monthly expenses meet or exceed monthly income; there is no capacity for a loan installment."
                .into(),
        );
    }
    if !periods.fract().is_zero() {
        warnings.push(format!(
            "Tenure of {} years is {periods} monthly periods; the fractional period is priced as-is.",
            inputs.tenure_years.normalize()
        ));
    }
    if rate.is_zero() {
        warnings.push(
            "Zero interest rate: principal equals installment times number of periods.".into(),
        );
    }

    let total_repayment = estimate
        .max_monthly_installment
        .checked_mul(periods)
        .map(round_currency)
        .ok_or_else(|| CalculationError::Overflow {
            context: "total repayment".into(),
        })?;
    let total_interest =
        round_currency((total_repayment - estimate.max_principal).max(Decimal::ZERO));

    let report = AffordabilityReport {
        max_monthly_installment: estimate.max_monthly_installment,
        max_principal: estimate.max_principal,
        disposable_income: disposable,
        monthly_rate: rate.round_dp(RATE_DISPLAY_DP),
        periods,
        total_repayment,
        total_interest,
        summary: summary_text(inputs, &estimate),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "installment_ratio": policy.installment_ratio.to_string(),
        "rate_conversion": "annual_percent / 12 / 100",
        "periods": "tenure_years * 12 (not truncated)",
        "rounding": "2dp, midpoint away from zero",
    });

    Ok(with_metadata(
        "Loan affordability (installment capacity + annuity present value)",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

fn summary_text(inputs: &LoanInputs, estimate: &LoanEstimate) -> String {
    format!(
        "Based on your income and expenses, you can afford a monthly EMI of {:.2}. \
         With {}% interest over {} years, you may be eligible for a loan of around {:.2}.",
        estimate.max_monthly_installment,
        inputs.annual_rate_percent.normalize(),
        inputs.tenure_years.normalize(),
        estimate.max_principal,
    )
}
