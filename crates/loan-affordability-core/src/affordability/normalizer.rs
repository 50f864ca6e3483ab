use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::engine::LoanInputs;
use crate::error::ValidationError;

/// The four form fields exactly as the user typed them.
///
/// JSON callers may send either strings or numbers for each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLoanInputs {
    #[serde(deserialize_with = "text_or_number")]
    pub income: String,
    #[serde(deserialize_with = "text_or_number")]
    pub expenses: String,
    #[serde(deserialize_with = "text_or_number")]
    pub rate: String,
    #[serde(deserialize_with = "text_or_number")]
    pub tenure: String,
}

impl RawLoanInputs {
    pub fn new(
        income: impl Into<String>,
        expenses: impl Into<String>,
        rate: impl Into<String>,
        tenure: impl Into<String>,
    ) -> Self {
        Self {
            income: income.into(),
            expenses: expenses.into(),
            rate: rate.into(),
            tenure: tenure.into(),
        }
    }
}

/// Parse and range-check raw form input.
///
/// Every field is parsed before any range check, so a non-numeric field is
/// always reported as `NotANumber` even when another field is negative.
/// Negative income, expenses, rate or tenure are `OutOfRange`. A zero tenure
/// passes here and is rejected by the engine.
pub fn normalize(raw: &RawLoanInputs) -> Result<LoanInputs, ValidationError> {
    let inputs = LoanInputs {
        monthly_income: parse_field("income", &raw.income)?,
        monthly_expenses: parse_field("expenses", &raw.expenses)?,
        annual_rate_percent: parse_field("rate", &raw.rate)?,
        tenure_years: parse_field("tenure", &raw.tenure)?,
    };

    reject_negative("income", inputs.monthly_income)?;
    reject_negative("expenses", inputs.monthly_expenses)?;
    reject_negative("rate", inputs.annual_rate_percent)?;
    reject_negative("tenure", inputs.tenure_years)?;

    debug!(?inputs, "normalized loan inputs");
    Ok(inputs)
}

/// Parse one decimal field. Accepts plain (`60000`, `7.25`, `.5`) and
/// scientific (`6e4`) notation, surrounded by whitespace. Anything else,
/// including empty input, `NaN`, infinities, digit separators and trailing
/// characters, is `NotANumber`. A well-formed number that does not fit a
/// 28-digit decimal is `OutOfRange`.
pub fn parse_field(field: &str, raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let literal = canonical_literal(trimmed).ok_or_else(|| not_a_number(field))?;

    let parsed = if literal.contains('e') {
        Decimal::from_scientific(&literal)
    } else {
        Decimal::from_str(&literal)
    };
    parsed.map_err(|_| ValidationError::OutOfRange {
        field: field.into(),
        reason: format!("{trimmed} does not fit a 28-digit decimal"),
    })
}

/// Rewrite `[+-]digits[.digits][(e|E)[+-]digits]` into a form both decimal
/// parsers accept (`.5` -> `0.5`, `5.` -> `5`, no `+`). None if `text` is
/// not a number literal.
fn canonical_literal(text: &str) -> Option<String> {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
        return None;
    }

    let mut literal = String::with_capacity(text.len() + 1);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int.is_empty() { "0" } else { int });
    if !frac.is_empty() {
        literal.push('.');
        literal.push_str(frac);
    }
    if let Some(exp) = exponent {
        let (exp_sign, exp_digits) = match exp.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", exp.strip_prefix('+').unwrap_or(exp)),
        };
        if exp_digits.is_empty() || !all_digits(exp_digits) {
            return None;
        }
        literal.push('e');
        literal.push_str(exp_sign);
        literal.push_str(exp_digits);
    }
    Some(literal)
}

fn reject_negative(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::OutOfRange {
            field: field.into(),
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

fn not_a_number(field: &str) -> ValidationError {
    ValidationError::NotANumber {
        field: field.into(),
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(s) => s,
        Field::Number(n) => n.to_string(),
    })
}
