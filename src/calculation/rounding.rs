//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PriceRange;

/// Number of decimal places of the smallest currency unit (cents).
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to whole cents, half away from zero.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::round_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_currency(dec!(2049.775)), dec!(2049.78));
/// assert_eq!(round_currency(dec!(2049.774)), dec!(2049.77));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        CURRENCY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Rounds both bounds of a range to whole cents.
pub fn round_range(range: PriceRange) -> PriceRange {
    range.map(round_currency)
}
