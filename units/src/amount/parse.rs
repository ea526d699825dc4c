use thiserror::Error;

use super::{Amount, THIN_SPACE};
use crate::{config::MAX_AMOUNT_DIGITS, unit::Unit};

/// Amount parsing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("More than one decimal point")]
    TooManyDecimalPoints,

    #[error("Too many fractional digits (max {max})")]
    ExcessivePrecision { max: u8 },

    #[error("Amount has too many digits")]
    TooManyDigits,

    #[error("Amount is not a valid number")]
    InvalidNumber,
}

/// Parse a user-typed decimal string into atomic units of the given display
/// unit. The exact inverse of [`super::format`]: the fraction is zero-padded
/// to the unit's precision and concatenated to the whole part, never rounded.
/// Excess fractional digits are an error, not a truncation.
pub fn parse(unit: Unit, text: &str) -> Result<Amount, ParseAmountError> {
    let num_decimals = unit.decimals() as usize;

    // Ignore spaces and thin spaces when parsing
    let stripped: String = text
        .chars()
        .filter(|c| *c != ' ' && *c != THIN_SPACE)
        .collect();
    if stripped.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let mut parts = stripped.split('.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(ParseAmountError::TooManyDecimalPoints);
    }

    if fraction.len() > num_decimals {
        return Err(ParseAmountError::ExcessivePrecision {
            max: num_decimals as u8,
        });
    }

    let mut digits = String::with_capacity(whole.len() + num_decimals);
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..num_decimals {
        digits.push('0');
    }

    // Longer numbers will exceed 63 bits
    if digits.len() > MAX_AMOUNT_DIGITS {
        return Err(ParseAmountError::TooManyDigits);
    }

    digits
        .parse::<Amount>()
        .map_err(|_| ParseAmountError::InvalidNumber)
}
