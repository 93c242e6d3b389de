//! Minimum/maximum money pairs.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A `[min, max]` pair of amounts kept at full decimal precision.
///
/// # Example
///
/// ```
/// use quote_engine::models::PriceRange;
/// use rust_decimal_macros::dec;
///
/// let volume = PriceRange::new(dec!(1000), dec!(1400));
/// let distance = PriceRange::fixed(dec!(100));
/// let total = volume + distance;
/// assert_eq!(total, PriceRange::new(dec!(1100), dec!(1500)));
/// assert_eq!(total.scale(dec!(1.25)).max, dec!(1875));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound.
    pub min: Decimal,
    /// Upper bound.
    pub max: Decimal,
}

impl PriceRange {
    /// The empty range `[0, 0]`.
    pub const ZERO: PriceRange = PriceRange {
        min: Decimal::ZERO,
        max: Decimal::ZERO,
    };

    /// Creates a range from its bounds.
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Creates a range whose bounds are both `amount`.
    pub fn fixed(amount: Decimal) -> Self {
        Self {
            min: amount,
            max: amount,
        }
    }

    /// Multiplies both bounds by `factor`.
    pub fn scale(self, factor: Decimal) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    /// Applies `f` to each bound independently.
    pub fn map(self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            min: f(self.min),
            max: f(self.max),
        }
    }

    /// Returns true when `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Returns true when both bounds are zero.
    pub fn is_zero(&self) -> bool {
        self.min.is_zero() && self.max.is_zero()
    }
}

impl Add for PriceRange {
    type Output = PriceRange;

    fn add(self, rhs: PriceRange) -> PriceRange {
        PriceRange {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

impl AddAssign for PriceRange {
    fn add_assign(&mut self, rhs: PriceRange) {
        self.min += rhs.min;
        self.max += rhs.max;
    }
}

impl Sum for PriceRange {
    fn sum<I: Iterator<Item = PriceRange>>(iter: I) -> PriceRange {
        iter.fold(PriceRange::ZERO, Add::add)
    }
}
