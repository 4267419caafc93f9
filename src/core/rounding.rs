//! Rounding policy and checked monetary arithmetic.
//!
//! Two granularities exist: three decimals for the intermediate line net
//! amount, two decimals for every other monetary figure. Both round half
//! away from zero on exact decimal values.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::FatooraError;

/// Decimal places of every reported monetary amount.
pub const MONEY_DP: u32 = 2;

/// Decimal places of the intermediate line net amount.
pub const LINE_NET_DP: u32 = 3;

const STRATEGY: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round to 2 decimals and fix the scale at 2, so `100` renders as `100.00`.
pub fn round2(value: Decimal) -> Result<Decimal, FatooraError> {
    round_fixed(value, MONEY_DP)
}

/// Round to 3 decimals and fix the scale at 3.
pub fn round3(value: Decimal) -> Result<Decimal, FatooraError> {
    round_fixed(value, LINE_NET_DP)
}

fn round_fixed(value: Decimal, dp: u32) -> Result<Decimal, FatooraError> {
    let mut rounded = value.round_dp_with_strategy(dp, STRATEGY);
    rounded.rescale(dp);
    // rescale silently drops precision when the mantissa cannot hold the scale
    if rounded.scale() != dp {
        return Err(FatooraError::RoundingOverflow(format!(
            "{value} cannot be represented with {dp} decimal places"
        )));
    }
    Ok(rounded)
}

/// Line net amount: `round3(quantity × unit_price − line_discount)`,
/// re-expressed at 2 decimals.
///
/// ```
/// use fatoora::core::rounding::line_net_amount;
/// use rust_decimal_macros::dec;
///
/// // 10.0049 → 10.005 → 10.01, where a direct 2-decimal round gives 10.00
/// assert_eq!(line_net_amount(dec!(1), dec!(10.0049), dec!(0)).unwrap(), dec!(10.01));
/// ```
pub fn line_net_amount(
    quantity: Decimal,
    unit_price: Decimal,
    line_discount: Decimal,
) -> Result<Decimal, FatooraError> {
    let gross = checked_mul(quantity, unit_price, "quantity × unit price")?;
    let net = checked_sub(gross, line_discount, "line amount − line discount")?;
    round2(round3(net)?)
}

/// `round2(amount × rate / 100)`.
pub fn percentage_of(amount: Decimal, rate: Decimal) -> Result<Decimal, FatooraError> {
    let product = checked_mul(amount, rate, "amount × tax rate")?;
    let tax = product
        .checked_div(dec!(100))
        .ok_or_else(|| FatooraError::RoundingOverflow(format!("{product} / 100")))?;
    round2(tax)
}

/// Sum with overflow detection.
pub fn checked_sum<I>(values: I) -> Result<Decimal, FatooraError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_add(acc, v, "sum"))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, op: &str) -> Result<Decimal, FatooraError> {
    a.checked_add(b)
        .ok_or_else(|| FatooraError::RoundingOverflow(format!("{op}: {a} + {b}")))
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, op: &str) -> Result<Decimal, FatooraError> {
    a.checked_sub(b)
        .ok_or_else(|| FatooraError::RoundingOverflow(format!("{op}: {a} - {b}")))
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, op: &str) -> Result<Decimal, FatooraError> {
    a.checked_mul(b)
        .ok_or_else(|| FatooraError::RoundingOverflow(format!("{op}: {a} × {b}")))
}

/// Convert a floating point input into a [`Decimal`], rejecting NaN and
/// infinite values. `field` names the input in the error message.
pub fn decimal_from_f64(value: f64, field: &str) -> Result<Decimal, FatooraError> {
    if !value.is_finite() {
        return Err(FatooraError::InvalidInput(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Decimal::from_f64(value).ok_or_else(|| {
        FatooraError::InvalidInput(format!("{field} {value} is out of decimal range"))
    })
}
