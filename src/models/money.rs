//! Amounts are stored as integer cents and exposed as decimals on the wire.

use serde::Serializer;

use crate::error::{AppError, AppResult};

/// Largest decimal amount accepted from a request. Sums over any realistic
/// history of such amounts stay far inside `i64` cents.
pub const MAX_AMOUNT: f64 = 1e13;

pub fn cents_to_decimal(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Convert a decimal amount from a request body into cents, rejecting
/// negative, non-finite and out-of-range values.
pub fn decimal_to_cents(field: &str, amount: f64) -> AppResult<i64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::Validation(format!(
            "{} must not exceed {:.0}",
            field, MAX_AMOUNT
        )));
    }
    Ok((amount * 100.0).round() as i64)
}

/// Adds `cents` to a running total, failing instead of wrapping.
pub fn add_cents(total: &mut i64, cents: i64) -> AppResult<()> {
    *total = total
        .checked_add(cents)
        .ok_or_else(|| AppError::Internal("Amount total out of range".into()))?;
    Ok(())
}

/// Sum of `amounts` in cents; an overflow is an error, never a wrapped total.
pub fn checked_total(amounts: impl IntoIterator<Item = i64>) -> AppResult<i64> {
    let mut total = 0;
    for cents in amounts {
        add_cents(&mut total, cents)?;
    }
    Ok(total)
}

/// `serialize_with` helper for `*_cents` fields.
pub fn as_decimal<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(cents_to_decimal(*cents))
}

pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let dollars = abs_cents / 100;
    let remainder = abs_cents % 100;

    if is_negative {
        format!("-{}.{:02}", dollars, remainder)
    } else {
        format!("{}.{:02}", dollars, remainder)
    }
}
