use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::affordability::engine::{
    compute_affordability_with_policy, AffordabilityPolicy, LoanInputs,
};
use crate::error::ValidationError;
use crate::types::*;
use crate::AffordabilityResult;

/// Upper bound on sweep points per axis.
pub const MAX_SWEEP_POINTS: usize = 200;

/// Input for a rate x tenure sweep of the affordable principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilitySensitivityInput {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    /// Annual rate sweep, in percent.
    pub rate: SensitivityVariable,
    /// Tenure sweep, in years.
    pub tenure: SensitivityVariable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_ratio: Option<Rate>,
}

/// Output of the rate x tenure sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilitySensitivityOutput {
    /// Installment capacity; the same for every cell.
    pub max_monthly_installment: Money,
    pub rate_values: Vec<Percent>,
    pub tenure_values: Vec<Years>,
    /// matrix[i][j] = max principal at rate_values[i], tenure_values[j]
    pub matrix: Vec<Vec<Money>>,
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> Result<Vec<Decimal>, ValidationError> {
    if var.step <= Decimal::ZERO {
        return Err(ValidationError::OutOfRange {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(ValidationError::OutOfRange {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(ValidationError::OutOfRange {
                field: format!("variable:{}", var.name),
                reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points"),
            });
        }
        values.push(current);
        // Stepping past the decimal range also means stepping past max.
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Sweep annual rate and tenure, holding income and expenses fixed, and
/// report the maximum principal at every grid point.
pub fn rate_tenure_sensitivity(
    input: &AffordabilitySensitivityInput,
) -> AffordabilityResult<ComputationOutput<AffordabilitySensitivityOutput>> {
    let start = Instant::now();

    let policy = match input.installment_ratio {
        Some(ratio) => AffordabilityPolicy::with_installment_ratio(ratio)?,
        None => AffordabilityPolicy::default(),
    };
    let rate_values = generate_sweep_values(&input.rate)?;
    let tenure_values = generate_sweep_values(&input.tenure)?;

    let mut matrix = Vec::with_capacity(rate_values.len());
    let mut max_monthly_installment = Decimal::ZERO;
    for &rate in &rate_values {
        let mut row = Vec::with_capacity(tenure_values.len());
        for &tenure in &tenure_values {
            let estimate = compute_affordability_with_policy(
                &LoanInputs {
                    monthly_income: input.monthly_income,
                    monthly_expenses: input.monthly_expenses,
                    annual_rate_percent: rate,
                    tenure_years: tenure,
                },
                &policy,
            )?;
            max_monthly_installment = estimate.max_monthly_installment;
            row.push(estimate.max_principal);
        }
        matrix.push(row);
    }

    debug!(
        rows = rate_values.len(),
        cols = tenure_values.len(),
        "computed rate x tenure sensitivity"
    );

    let output = AffordabilitySensitivityOutput {
        max_monthly_installment,
        rate_values,
        tenure_values,
        matrix,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_income": input.monthly_income.to_string(),
        "monthly_expenses": input.monthly_expenses.to_string(),
        "installment_ratio": policy.installment_ratio.to_string(),
    });

    Ok(with_metadata(
        "Affordable principal sensitivity (annual rate x tenure)",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AffordabilityError, CalculationError};
    use rust_decimal_macros::dec;

    fn var(name: &str, min: Decimal, max: Decimal, step: Decimal) -> SensitivityVariable {
        SensitivityVariable {
            name: name.into(),
            min,
            max,
            step,
        }
    }

    fn base_input() -> AffordabilitySensitivityInput {
        AffordabilitySensitivityInput {
            monthly_income: dec!(60000),
            monthly_expenses: dec!(20000),
            rate: var("rate", dec!(0), dec!(10), dec!(5)),
            tenure: var("tenure", dec!(5), dec!(10), dec!(5)),
            installment_ratio: None,
        }
    }

    #[test]
    fn test_sweep_includes_max() {
        let values = generate_sweep_values(&var("x", dec!(1), dec!(2), dec!(0.4))).unwrap();
        assert_eq!(values, vec![dec!(1), dec!(1.4), dec!(1.8), dec!(2)]);
    }

    #[test]
    fn test_sweep_rejects_bad_step() {
        assert!(generate_sweep_values(&var("x", dec!(1), dec!(2), dec!(0))).is_err());
        assert!(generate_sweep_values(&var("x", dec!(3), dec!(2), dec!(1))).is_err());
        assert!(generate_sweep_values(&var("x", dec!(0), dec!(1000), dec!(1))).is_err());
    }

    #[test]
    fn test_grid_shape_and_known_cells() {
        let out = rate_tenure_sensitivity(&base_input()).unwrap().result;
        assert_eq!(out.rate_values, vec![dec!(0), dec!(5), dec!(10)]);
        assert_eq!(out.tenure_values, vec![dec!(5), dec!(10)]);
        assert_eq!(out.matrix.len(), 3);
        assert!(out.matrix.iter().all(|row| row.len() == 2));
        assert_eq!(out.max_monthly_installment, dec!(16000.00));
        assert_eq!(out.matrix[0][0], dec!(960000.00));
        assert_eq!(out.matrix[2][1], dec!(1210738.61));
    }

    #[test]
    fn test_principal_falls_down_each_column() {
        let out = rate_tenure_sensitivity(&base_input()).unwrap().result;
        for j in 0..out.tenure_values.len() {
            for i in 1..out.rate_values.len() {
                assert!(out.matrix[i][j] <= out.matrix[i - 1][j]);
            }
        }
    }

    #[test]
    fn test_sweep_near_decimal_max_stops_without_overflow() {
        let sci = |s: &str| Decimal::from_scientific(s).unwrap();
        let values = generate_sweep_values(&var("rate", sci("7e28"), sci("7.9e28"), sci("5e28")))
            .unwrap();
        assert_eq!(values, vec![sci("7e28"), sci("7.9e28")]);
    }

    #[test]
    fn test_huge_sweep_values_are_calculation_errors() {
        let sci = |s: &str| Decimal::from_scientific(s).unwrap();

        let mut input = base_input();
        input.rate = var("rate", sci("7e28"), sci("7.9e28"), sci("5e28"));
        let err = rate_tenure_sensitivity(&input).unwrap_err();
        assert!(matches!(
            err,
            AffordabilityError::Calculation(CalculationError::Overflow { .. })
        ));

        let mut input = base_input();
        input.tenure = var("tenure", sci("1e28"), sci("1e28"), dec!(1));
        let err = rate_tenure_sensitivity(&input).unwrap_err();
        assert!(matches!(
            err,
            AffordabilityError::Calculation(CalculationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_zero_tenure_in_sweep_is_calculation_error() {
        let mut input = base_input();
        input.tenure = var("tenure", dec!(0), dec!(5), dec!(5));
        let err = rate_tenure_sensitivity(&input).unwrap_err();
        assert!(matches!(
            err,
            AffordabilityError::Calculation(CalculationError::InvalidTenure { .. })
        ));
    }
}
