use loan_affordability_core::affordability::{self, AffordabilityPolicy, LoanEstimate, RawLoanInputs};
use loan_affordability_core::time_value;
use loan_affordability_core::{AffordabilityError, CalculationError, ValidationError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn estimate(income: &str, expenses: &str, rate: &str, tenure: &str) -> Result<LoanEstimate, AffordabilityError> {
    let inputs = affordability::normalize(&RawLoanInputs::new(income, expenses, rate, tenure))?;
    Ok(affordability::compute_affordability(&inputs)?)
}

// ===========================================================================
// Reference households
// ===========================================================================

#[test]
fn test_salaried_household_ten_year_loan() {
    // 40% of (60k - 20k) = 16k; R = 10/12/100, N = 120
    let est = estimate("60000", "20000", "10", "10").unwrap();
    assert_eq!(
        est,
        LoanEstimate {
            max_monthly_installment: dec!(16000.00),
            max_principal: dec!(1210738.61),
        }
    );
}

#[test]
fn test_overspending_household_gets_nothing() {
    let est = estimate("20000", "25000", "10", "10").unwrap();
    assert_eq!(
        est,
        LoanEstimate {
            max_monthly_installment: Decimal::ZERO,
            max_principal: Decimal::ZERO,
        }
    );
}

#[test]
fn test_interest_free_loan() {
    let est = estimate("60000", "20000", "0", "5").unwrap();
    assert_eq!(est.max_monthly_installment, dec!(16000.00));
    assert_eq!(est.max_principal, dec!(960000.00));
}

#[test]
fn test_principal_reproduces_installment() {
    let est = estimate("85000", "31000", "8.75", "20").unwrap();
    let rate = affordability::engine::monthly_rate(dec!(8.75));
    let periods = affordability::engine::tenure_periods(dec!(20)).unwrap();
    let emi = time_value::annuity_payment(rate, periods, est.max_principal).unwrap();
    assert!(
        (emi - est.max_monthly_installment).abs() <= dec!(0.01),
        "EMI {emi} vs installment {}",
        est.max_monthly_installment
    );
}

// ===========================================================================
// Error paths
// ===========================================================================

#[test]
fn test_any_non_numeric_field_is_not_a_number() {
    let cases = [
        ("abc", "20000", "10", "10", "income"),
        ("60000", "", "10", "10", "expenses"),
        ("60000", "20000", "ten", "10", "rate"),
        ("60000", "20000", "10", "10 years", "tenure"),
    ];
    for (income, expenses, rate, tenure, field) in cases {
        let err = estimate(income, expenses, rate, tenure).unwrap_err();
        match err {
            AffordabilityError::Validation(ValidationError::NotANumber { field: f }) => {
                assert_eq!(f, field)
            }
            other => panic!("Expected NotANumber for {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_negative_expenses_out_of_range() {
    let err = estimate("60000", "-100", "10", "10").unwrap_err();
    assert!(matches!(
        err,
        AffordabilityError::Validation(ValidationError::OutOfRange { .. })
    ));
}

#[test]
fn test_zero_tenure_is_invalid_tenure() {
    let err = estimate("60000", "20000", "10", "0").unwrap_err();
    assert!(matches!(
        err,
        AffordabilityError::Calculation(CalculationError::InvalidTenure { .. })
    ));
}

#[test]
fn test_engine_rejects_negative_rate_from_direct_callers() {
    let inputs = affordability::LoanInputs {
        monthly_income: dec!(60000),
        monthly_expenses: dec!(20000),
        annual_rate_percent: dec!(-2),
        tenure_years: dec!(10),
    };
    let err = affordability::compute_affordability(&inputs).unwrap_err();
    assert!(matches!(err, CalculationError::InvalidRate { .. }));
}

#[test]
fn test_error_messages_are_displayable() {
    let err = estimate("x", "0", "0", "1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not a number: income must be a finite decimal value"
    );
}

// ===========================================================================
// Report envelope
// ===========================================================================

#[test]
fn test_report_serializes_amounts_as_strings() {
    let out = affordability::analyze_raw(
        &RawLoanInputs::new("60000", "20000", "0", "5"),
        &AffordabilityPolicy::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["max_monthly_installment"], "16000.00");
    assert_eq!(json["result"]["max_principal"], "960000.00");
    assert_eq!(json["result"]["total_interest"], "0.00");
}

// ===========================================================================
// Decimal range boundaries
// ===========================================================================

fn assert_overflow(result: Result<LoanEstimate, AffordabilityError>, case: &str) {
    match result {
        Err(AffordabilityError::Calculation(CalculationError::Overflow { .. })) => {}
        other => panic!("Expected Overflow for {case}, got {other:?}"),
    }
}

#[test]
fn test_inputs_at_top_of_decimal_range_return_errors() {
    // Decimal::MAX income: the installment fits, the principal does not.
    assert_overflow(
        estimate("79228162514264337593543950335", "0", "10", "10"),
        "max income",
    );
    assert_overflow(estimate("60000", "20000", "1e28", "10"), "huge rate");
    assert_overflow(estimate("60000", "20000", "10", "1e28"), "huge tenure");
    assert_overflow(estimate("60000", "20000", "10", "7e27"), "tenure just past range");
}

#[test]
fn test_huge_expenses_clamp_to_zero() {
    let est = estimate("0", "1e28", "10", "10").unwrap();
    assert_eq!(est.max_monthly_installment, Decimal::ZERO);
    assert_eq!(est.max_principal, Decimal::ZERO);
}

#[test]
fn test_huge_rate_over_short_fractional_tenure_never_panics() {
    match estimate("60000", "20000", "1e28", "0.01") {
        Ok(est) => assert!(est.max_principal >= Decimal::ZERO),
        Err(AffordabilityError::Calculation(CalculationError::Overflow { .. })) => {}
        Err(other) => panic!("Unexpected error {other:?}"),
    }
}

#[test]
fn test_oversized_literal_is_out_of_range() {
    let err = estimate("1e30", "0", "10", "10").unwrap_err();
    assert!(matches!(
        err,
        AffordabilityError::Validation(ValidationError::OutOfRange { .. })
    ));
}
