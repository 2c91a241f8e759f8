//! # Money Module
//!
//! Provides the `Money` type for prices, shipping costs and order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A menu priced with floats:                                             │
//! │    3 × 3.30€ = 9.899999999999999€  → "free shipping" check flips!      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 × 330 cents = 990 cents, compared exactly against 1000            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use deliverus_core::money::Money;
//!
//! let price = Money::from_cents(1250); // 12.50€
//!
//! let line = price * 2i64;                       // 25.00€
//! let total = line + Money::from_cents(250);     // 27.50€
//! assert_eq!(total.to_string(), "27.50€");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in euro cents.
///
/// Serialized in JSON as a plain integer number of cents, and stored in
/// SQLite as an INTEGER column.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► OrderLine.unity_price (snapshot at order time)    │
/// │                  │                                                      │
/// │                  └──► Cart summary line ("2 × 12.50€")                  │
/// │                                                                         │
/// │  Σ lines = subtotal ──► shipping_for() ──► Order.price (total)          │
/// │                              ▲                                          │
/// │                  Restaurant.shipping_costs                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use deliverus_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99€
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from euros and cents.
    ///
    /// ## Example
    /// ```rust
    /// use deliverus_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(2, 50).cents(), 250);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole euros portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use deliverus_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// [`Money::multiply_quantity`] that returns `None` instead of overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use deliverus_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(450).checked_multiply_quantity(2), Some(Money::from_cents(900)));
    /// assert_eq!(Money::from_cents(450).checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Shipping costs owed for a product subtotal.
///
/// Shipping is waived when the subtotal is strictly greater than
/// `threshold`; a subtotal exactly at the threshold still pays shipping.
///
/// ## Example
/// ```rust
/// use deliverus_core::money::{shipping_for, Money};
///
/// let threshold = Money::from_cents(1000);
/// let costs = Money::from_cents(250);
///
/// assert_eq!(shipping_for(Money::from_cents(1000), costs, threshold), costs);
/// assert!(shipping_for(Money::from_cents(1001), costs, threshold).is_zero());
/// ```
pub fn shipping_for(subtotal: Money, shipping_costs: Money, threshold: Money) -> Money {
    if subtotal > threshold {
        Money::zero()
    } else {
        shipping_costs
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays as `12.50€`, the way the customer app renders prices.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}€", sign, self.euros().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * i64::from(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.euros(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1250).to_string(), "12.50€");
        assert_eq!(Money::from_cents(500).to_string(), "5.00€");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50€");
        assert_eq!(Money::from_cents(0).to_string(), "0.00€");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3_i64).cents(), 3000);
        assert_eq!((b * 2_u32).cents(), 1000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_float_trap_is_avoided() {
        // 3 × 3.30 is 9.899999... in floating point
        let subtotal = Money::from_cents(330) * 3_i64;
        assert_eq!(subtotal.cents(), 990);
    }

    #[rstest]
    #[case(0, 250)]
    #[case(999, 250)]
    #[case(1000, 250)]
    #[case(1001, 0)]
    #[case(5000, 0)]
    fn test_shipping_waived_strictly_above_threshold(
        #[case] subtotal: i64,
        #[case] expected: i64,
    ) {
        let shipping = shipping_for(
            Money::from_cents(subtotal),
            Money::from_cents(250),
            Money::from_cents(1000),
        );
        assert_eq!(shipping.cents(), expected);
    }

    #[test]
    fn test_json_is_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "1250");
        let back: Money = serde_json::from_str("250").unwrap();
        assert_eq!(back, Money::from_cents(250));
    }
}
