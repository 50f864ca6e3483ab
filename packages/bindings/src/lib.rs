use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use loan_affordability_core::affordability::{self, AffordabilityPolicy, RawLoanInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn policy_from(installment_ratio: Option<String>) -> NapiResult<AffordabilityPolicy> {
    match installment_ratio {
        Some(ratio) => {
            let ratio: Decimal = ratio.trim().parse().map_err(to_napi_error)?;
            AffordabilityPolicy::with_installment_ratio(ratio).map_err(to_napi_error)
        }
        None => Ok(AffordabilityPolicy::default()),
    }
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

/// Raw form strings in, report JSON out. This is what the calculator page
/// calls on submit.
#[napi]
pub fn estimate_affordability(
    income: String,
    expenses: String,
    rate: String,
    tenure: String,
    installment_ratio: Option<String>,
) -> NapiResult<String> {
    let raw = RawLoanInputs::new(income, expenses, rate, tenure);
    let policy = policy_from(installment_ratio)?;
    let output = affordability::analyze_raw(&raw, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_affordability_json(input_json: String) -> NapiResult<String> {
    let raw: RawLoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = affordability::analyze_raw(&raw, &AffordabilityPolicy::default())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_installment(input_json: String) -> NapiResult<String> {
    let input: affordability::InstallmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = affordability::calculate_installment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn rate_tenure_sensitivity(input_json: String) -> NapiResult<String> {
    let input: loan_affordability_core::sensitivity::AffordabilitySensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_affordability_core::sensitivity::rate_tenure_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
