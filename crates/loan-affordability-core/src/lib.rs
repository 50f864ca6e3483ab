pub mod affordability;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use affordability::{
    analyze_affordability, analyze_raw, compute_affordability, normalize, AffordabilityPolicy,
    LoanEstimate, LoanInputs, RawLoanInputs,
};
pub use error::{AffordabilityError, CalculationError, ValidationError};
pub use types::*;

/// Standard result type for all affordability operations
pub type AffordabilityResult<T> = Result<T, AffordabilityError>;
