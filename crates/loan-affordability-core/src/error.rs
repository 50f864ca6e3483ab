use thiserror::Error;

/// Raw input could not be turned into usable loan inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Not a number: {field} must be a finite decimal value")]
    NotANumber { field: String },

    #[error("Out of range: {field}: {reason}")]
    OutOfRange { field: String, reason: String },
}

/// Loan inputs were well-formed but cannot be priced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("Invalid tenure: {periods} monthly periods (must be greater than zero)")]
    InvalidTenure { periods: String },

    #[error("Invalid rate: {rate} (interest rate must not be negative)")]
    InvalidRate { rate: String },

    #[error("Invalid policy: installment ratio {ratio} must be in (0, 1]")]
    InvalidPolicy { ratio: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },
}

#[derive(Debug, Error)]
pub enum AffordabilityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AffordabilityError {
    fn from(e: serde_json::Error) -> Self {
        AffordabilityError::SerializationError(e.to_string())
    }
}
