use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CalculationError;
use crate::time_value::{present_value_of_annuity, round_currency};
use crate::types::{Money, Percent, Periods, Rate, Years};

/// Share of disposable income a lender will let go to the installment.
pub const DEFAULT_INSTALLMENT_RATIO: Decimal = dec!(0.4);

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Household figures for one affordability calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    /// Annual interest rate as a percentage (10 = 10% per year).
    pub annual_rate_percent: Percent,
    pub tenure_years: Years,
}

/// Maximum affordable installment and the principal it services, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanEstimate {
    pub max_monthly_installment: Money,
    pub max_principal: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityPolicy {
    /// Fraction of disposable income available for the installment, in (0, 1].
    pub installment_ratio: Rate,
}

impl Default for AffordabilityPolicy {
    fn default() -> Self {
        Self {
            installment_ratio: DEFAULT_INSTALLMENT_RATIO,
        }
    }
}

impl AffordabilityPolicy {
    pub fn with_installment_ratio(installment_ratio: Rate) -> Result<Self, CalculationError> {
        let policy = Self { installment_ratio };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), CalculationError> {
        if self.installment_ratio <= Decimal::ZERO || self.installment_ratio > Decimal::ONE {
            return Err(CalculationError::InvalidPolicy {
                ratio: self.installment_ratio.to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly decimal rate from an annual percentage: `annual / 12 / 100`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT
}

/// Number of monthly periods in `tenure_years`. Fractional tenures are kept
/// as-is, never truncated.
pub fn tenure_periods(tenure_years: Years) -> Result<Periods, CalculationError> {
    tenure_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| CalculationError::Overflow {
            context: format!("tenure of {tenure_years} years in months"),
        })
}

/// Estimate the largest installment and loan principal the household can
/// afford under the default 40% installment rule.
pub fn compute_affordability(inputs: &LoanInputs) -> Result<LoanEstimate, CalculationError> {
    compute_affordability_with_policy(inputs, &AffordabilityPolicy::default())
}

/// As [`compute_affordability`], with a caller-supplied installment ratio.
pub fn compute_affordability_with_policy(
    inputs: &LoanInputs,
    policy: &AffordabilityPolicy,
) -> Result<LoanEstimate, CalculationError> {
    policy.validate()?;

    if inputs.annual_rate_percent < Decimal::ZERO {
        return Err(CalculationError::InvalidRate {
            rate: format!("{}% per year", inputs.annual_rate_percent),
        });
    }

    let periods = tenure_periods(inputs.tenure_years)?;
    if periods <= Decimal::ZERO {
        return Err(CalculationError::InvalidTenure {
            periods: periods.to_string(),
        });
    }

    let installment = installment_capacity(inputs, policy)?;
    let rate = monthly_rate(inputs.annual_rate_percent);
    let principal = present_value_of_annuity(rate, periods, installment)?;

    debug!(
        %installment,
        %rate,
        %periods,
        %principal,
        "computed affordability"
    );

    Ok(LoanEstimate {
        max_monthly_installment: round_currency(installment),
        max_principal: round_currency(principal),
    })
}

/// Unrounded installment capacity: `ratio * (income - expenses)`, floored at
/// zero so a household spending all its income can afford nothing.
pub fn installment_capacity(
    inputs: &LoanInputs,
    policy: &AffordabilityPolicy,
) -> Result<Money, CalculationError> {
    let disposable = disposable_income(inputs)?;
    let capacity = disposable
        .checked_mul(policy.installment_ratio)
        .ok_or_else(|| CalculationError::Overflow {
            context: "installment capacity".into(),
        })?;
    Ok(capacity.max(Decimal::ZERO))
}

/// Monthly income minus monthly expenses. May be negative.
pub fn disposable_income(inputs: &LoanInputs) -> Result<Money, CalculationError> {
    inputs
        .monthly_income
        .checked_sub(inputs.monthly_expenses)
        .ok_or_else(|| CalculationError::Overflow {
            context: "disposable income".into(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs(income: Decimal, expenses: Decimal, rate: Decimal, tenure: Decimal) -> LoanInputs {
        LoanInputs {
            monthly_income: income,
            monthly_expenses: expenses,
            annual_rate_percent: rate,
            tenure_years: tenure,
        }
    }

    #[test]
    fn test_reference_household() {
        let est = compute_affordability(&inputs(dec!(60000), dec!(20000), dec!(10), dec!(10)))
            .unwrap();
        assert_eq!(est.max_monthly_installment, dec!(16000.00));
        // 16000 * (1.008333..^120 - 1) / (0.008333.. * 1.008333..^120)
        assert_eq!(est.max_principal, dec!(1210738.61));
    }

    #[test]
    fn test_expenses_exceed_income_clamps_to_zero() {
        let est = compute_affordability(&inputs(dec!(20000), dec!(25000), dec!(10), dec!(10)))
            .unwrap();
        assert_eq!(est.max_monthly_installment, Decimal::ZERO);
        assert_eq!(est.max_principal, Decimal::ZERO);
    }

    #[test]
    fn test_expenses_equal_income_is_zero() {
        let est = compute_affordability(&inputs(dec!(30000), dec!(30000), dec!(7.5), dec!(20)))
            .unwrap();
        assert_eq!(est.max_monthly_installment, Decimal::ZERO);
        assert_eq!(est.max_principal, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_uses_closed_form() {
        let est = compute_affordability(&inputs(dec!(60000), dec!(20000), dec!(0), dec!(5)))
            .unwrap();
        assert_eq!(est.max_monthly_installment, dec!(16000.00));
        assert_eq!(est.max_principal, dec!(960000.00));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = compute_affordability(&inputs(dec!(60000), dec!(20000), dec!(-1), dec!(5)))
            .unwrap_err();
        assert!(matches!(err, CalculationError::InvalidRate { .. }));
    }

    #[test]
    fn test_zero_tenure_rejected() {
        let err = compute_affordability(&inputs(dec!(60000), dec!(20000), dec!(10), dec!(0)))
            .unwrap_err();
        assert!(matches!(err, CalculationError::InvalidTenure { .. }));
    }

    #[test]
    fn test_negative_tenure_rejected() {
        let err = compute_affordability(&inputs(dec!(60000), dec!(20000), dec!(10), dec!(-3)))
            .unwrap_err();
        assert_eq!(
            err,
            CalculationError::InvalidTenure {
                periods: "-36".into()
            }
        );
    }

    #[test]
    fn test_fractional_tenure_is_not_truncated() {
        // 2.5 years is exactly 30 months; 2.55 years is 30.6 months.
        let whole = compute_affordability(&inputs(dec!(50000), dec!(10000), dec!(9), dec!(2.5)))
            .unwrap();
        let fractional =
            compute_affordability(&inputs(dec!(50000), dec!(10000), dec!(9), dec!(2.55))).unwrap();
        let longer = compute_affordability(&inputs(dec!(50000), dec!(10000), dec!(9), dec!(2.6)))
            .unwrap();
        assert!(fractional.max_principal > whole.max_principal);
        assert!(fractional.max_principal < longer.max_principal);
    }

    #[test]
    fn test_installment_rounds_half_up() {
        // 0.4 * 0.0125 = 0.005 -> 0.01
        let est = compute_affordability(&inputs(dec!(0.0125), dec!(0), dec!(0), dec!(1))).unwrap();
        assert_eq!(est.max_monthly_installment, dec!(0.01));
    }

    #[test]
    fn test_custom_policy_ratio() {
        let policy = AffordabilityPolicy::with_installment_ratio(dec!(0.5)).unwrap();
        let est = compute_affordability_with_policy(
            &inputs(dec!(60000), dec!(20000), dec!(0), dec!(1)),
            &policy,
        )
        .unwrap();
        assert_eq!(est.max_monthly_installment, dec!(20000));
        assert_eq!(est.max_principal, dec!(240000));
    }

    #[test]
    fn test_policy_ratio_out_of_range() {
        assert!(AffordabilityPolicy::with_installment_ratio(Decimal::ZERO).is_err());
        assert!(AffordabilityPolicy::with_installment_ratio(dec!(1.01)).is_err());
        assert!(AffordabilityPolicy::with_installment_ratio(Decimal::ONE).is_ok());
    }

    #[test]
    fn test_monthly_rate_and_periods() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(tenure_periods(dec!(2.5)).unwrap(), dec!(30));
    }

    #[test]
    fn test_huge_tenure_is_overflow() {
        let tenure = Decimal::from_scientific("1e28").unwrap();
        let err = compute_affordability(&inputs(dec!(60000), dec!(20000), dec!(10), tenure))
            .unwrap_err();
        assert!(matches!(err, CalculationError::Overflow { .. }));
        assert!(tenure_periods(Decimal::from_scientific("7e27").unwrap()).is_err());
    }

    #[test]
    fn test_disposable_income_overflow() {
        let err = compute_affordability(&inputs(Decimal::MAX, -Decimal::MAX, dec!(10), dec!(10)))
            .unwrap_err();
        assert!(matches!(err, CalculationError::Overflow { .. }));
    }
}
