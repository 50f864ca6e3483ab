use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::MathematicalOps;

use crate::error::CalculationError;
use crate::types::{Money, Periods, Rate};

/// Currency amounts are displayed to the cent.
pub const CURRENCY_DP: u32 = 2;

/// Round a currency amount to cents, half-up (midpoint away from zero).
/// The result always carries exactly two decimal places.
pub fn round_currency(value: Money) -> Money {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Compound growth factor `(1 + rate)^periods`. `periods` may be fractional.
pub fn growth_factor(rate: Rate, periods: Periods) -> Result<Decimal, CalculationError> {
    (Decimal::ONE + rate)
        .checked_powd(periods)
        .ok_or_else(|| CalculationError::Overflow {
            context: format!("growth factor (1 + {rate})^{periods}"),
        })
}

/// Present value of a level annuity: the principal that `payment` per period
/// services over `periods` at periodic `rate`.
///
/// A zero rate, or one too small to move `1 + rate` at decimal precision,
/// uses the closed-form limit `payment * periods`.
pub fn present_value_of_annuity(
    rate: Rate,
    periods: Periods,
    payment: Money,
) -> Result<Money, CalculationError> {
    validate_terms(rate, periods)?;
    if payment.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let factor = growth_factor(rate, periods)?;
    if rate.is_zero() || factor == Decimal::ONE {
        return checked(payment.checked_mul(periods), "zero-rate annuity value");
    }

    let denominator = checked(rate.checked_mul(factor), "annuity denominator")?;
    let annuity_factor = checked(
        (factor - Decimal::ONE).checked_div(denominator),
        "annuity factor",
    )?;
    checked(payment.checked_mul(annuity_factor), "annuity present value")
}

/// Level payment (EMI) that amortises `principal` over `periods` at `rate`.
pub fn annuity_payment(
    rate: Rate,
    periods: Periods,
    principal: Money,
) -> Result<Money, CalculationError> {
    validate_terms(rate, periods)?;
    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let factor = growth_factor(rate, periods)?;
    if rate.is_zero() || factor == Decimal::ONE {
        return checked(principal.checked_div(periods), "zero-rate payment");
    }

    let numerator = checked(
        principal
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(factor)),
        "payment numerator",
    )?;
    checked(
        numerator.checked_div(factor - Decimal::ONE),
        "annuity payment",
    )
}

fn validate_terms(rate: Rate, periods: Periods) -> Result<(), CalculationError> {
    if periods <= Decimal::ZERO {
        return Err(CalculationError::InvalidTenure {
            periods: periods.to_string(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(CalculationError::InvalidRate {
            rate: rate.to_string(),
        });
    }
    Ok(())
}

fn checked(value: Option<Decimal>, context: &str) -> Result<Decimal, CalculationError> {
    value.ok_or_else(|| CalculationError::Overflow {
        context: context.to_string(),
    })
}
