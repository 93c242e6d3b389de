//! Overflow-checked decimal arithmetic.
//!
//! `rust_decimal` panics when a product or sum leaves its 96-bit range, and
//! move facts carry no upper bound. Every calculation that multiplies or adds
//! input magnitudes goes through these helpers, so an oversized input fails
//! as [`EngineError::InvalidInput`] on the field that drove it.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::PriceRange;

/// Builds the error reported when `field` drives an amount out of range.
pub fn overflow(field: &str) -> EngineError {
    EngineError::invalid_input(field, "too large to calculate with")
}

/// `lhs × rhs`, or an overflow error on `field`.
pub fn checked_mul(field: &str, lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(field))
}

/// `lhs + rhs`, or an overflow error on `field`.
pub fn checked_add(field: &str, lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(field))
}

/// Multiplies both bounds of `range` by `factor`.
pub fn checked_scale(
    field: &str,
    range: PriceRange,
    factor: Decimal,
) -> EngineResult<PriceRange> {
    Ok(PriceRange::new(
        checked_mul(field, range.min, factor)?,
        checked_mul(field, range.max, factor)?,
    ))
}

/// Adds two ranges bound by bound.
pub fn checked_add_range(
    field: &str,
    lhs: PriceRange,
    rhs: PriceRange,
) -> EngineResult<PriceRange> {
    Ok(PriceRange::new(
        checked_add(field, lhs.min, rhs.min)?,
        checked_add(field, lhs.max, rhs.max)?,
    ))
}

/// Sums ranges, failing on the first overflow.
pub fn checked_sum<'a>(
    field: &str,
    ranges: impl IntoIterator<Item = &'a PriceRange>,
) -> EngineResult<PriceRange> {
    ranges
        .into_iter()
        .try_fold(PriceRange::ZERO, |total, range| checked_add_range(field, total, *range))
}
