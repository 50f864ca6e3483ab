//! Household loan affordability: raw form input is normalized into
//! [`LoanInputs`], the engine turns 40% of disposable income into an
//! installment and inverts the annuity formula to get the principal.

pub mod engine;
pub mod installment;
pub mod normalizer;
pub mod report;

pub use engine::{
    compute_affordability, compute_affordability_with_policy, AffordabilityPolicy, LoanEstimate,
    LoanInputs, DEFAULT_INSTALLMENT_RATIO,
};
pub use installment::{calculate_installment, InstallmentInput, InstallmentOutput};
pub use normalizer::{normalize, RawLoanInputs};
pub use report::{analyze_affordability, analyze_raw, AffordabilityReport};
