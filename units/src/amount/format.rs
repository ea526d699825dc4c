use super::{Amount, SeparatorStyle, THIN_SPACE, THIN_SPACE_HTML};
use crate::{rates::RateStore, unit::Unit};

/// Render an amount of atomic units as a decimal string in the given
/// display unit, with exactly `unit.decimals()` fractional digits.
///
/// `with_sign` adds a leading `+` for strictly positive amounts; negative
/// amounts always carry a `-`. A unit whose scaling factor has not been
/// populated yet (fiat before the first rate refresh) renders as a zero
/// valued string instead of failing.
///
/// The whole/fraction split is done with exact integer arithmetic, rounding
/// the fraction half away from zero. No floating point is involved, so the
/// last digit stays exact even near the supply cap.
pub fn format(
    unit: Unit,
    amount: Amount,
    with_sign: bool,
    separators: SeparatorStyle,
    rates: &RateStore,
) -> String {
    let coin = rates.factor(unit);
    let num_decimals = unit.decimals() as u32;
    let scale = 10u64.pow(num_decimals);
    let n_abs = amount.unsigned_abs();

    let (mut quotient, mut remainder) = if coin > 0 {
        (n_abs / coin as u64, n_abs % coin as u64)
    } else {
        // Rate not available, degrade to a zero quotient instead of
        // dividing by zero
        (0, 0)
    };

    // Fraction scaled to exactly `num_decimals` digits
    if coin > 0 {
        let coin = coin as u128;
        remainder = ((remainder as u128 * scale as u128 + coin / 2) / coin) as u64;
        // Rounding may spill into the whole part
        if remainder >= scale {
            quotient += 1;
            remainder -= scale;
        }
    }

    let mut quotient_str = quotient.to_string();

    let q_len = quotient_str.len();
    if separators == SeparatorStyle::Always
        || (separators == SeparatorStyle::Standard && q_len > 4)
    {
        // Digits are ASCII, so these byte offsets are char boundaries and
        // stay valid while inserting right to left
        let mut i = 3;
        while i < q_len {
            quotient_str.insert(q_len - i, THIN_SPACE);
            i += 3;
        }
    }

    if amount < 0 {
        quotient_str.insert(0, '-');
    } else if with_sign && amount > 0 {
        quotient_str.insert(0, '+');
    }

    format!(
        "{}.{:0>width$}",
        quotient_str,
        remainder,
        width = num_decimals as usize
    )
}

/// Same as [`format`] with the unit symbol appended
pub fn format_with_unit(
    unit: Unit,
    amount: Amount,
    with_sign: bool,
    separators: SeparatorStyle,
    rates: &RateStore,
) -> String {
    format!(
        "{} {}",
        format(unit, amount, with_sign, separators, rates),
        unit.symbol()
    )
}

/// [`format_with_unit`] for HTML contexts: the thin space separator is
/// escaped to its entity so whitespace canonicalisation can't widen it, and
/// the whole string is wrapped in a no-wrap span so quantities never break
/// at a separator.
pub fn format_html_with_unit(
    unit: Unit,
    amount: Amount,
    with_sign: bool,
    separators: SeparatorStyle,
    rates: &RateStore,
) -> String {
    let text = format_with_unit(unit, amount, with_sign, separators, rates)
        .replace(THIN_SPACE, THIN_SPACE_HTML);
    format!("<span style='white-space: nowrap;'>{}</span>", text)
}
