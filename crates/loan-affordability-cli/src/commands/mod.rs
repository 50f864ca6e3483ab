pub mod affordability;
pub mod installment;
pub mod sensitivity;
