//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront sends prices as JSON numbers:                          │
//! │    29.99 × 3 = 89.97000000000001  ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "29.99" is parsed as text → 2999 cents                              │
//! │    2999 × 3 = 8997 cents → "89.97"                                     │
//! │                                                                         │
//! │  Floats never touch a price: not on the way in, not on the way out.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(line.cents(), 3297);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use ts_rs::TS;

/// Number of minor units in one major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: A snapshot edited by hand may hold a negative price;
///   the type can represent it so the cart can detect and ignore it
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as the bare integer**: `{"priceCents": 2999}`
///
/// ## Where Money is Used
/// ```text
/// AddItem payload price ──► CartItem.price ──► line total ──► Cart total
///                                   │
///                                   └──► CreateOrderRequest line price
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(85, 0).cents(), 8500);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let unit = Money::from_cents(299);
    /// assert_eq!(unit.checked_mul_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(qty)).map(Money)
    }

    /// Adds, clamping at `i64::MAX` cents instead of wrapping.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Renders the amount in major units without a currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2999).to_major_string(), "29.99");
    /// assert_eq!(Money::from_cents(3000).to_major_string(), "30.00");
    /// assert_eq!(Money::from_cents(-5).to_major_string(), "-0.05");
    /// ```
    pub fn to_major_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }

    /// Converts to a JSON number in major units, as the order service expects.
    ///
    /// The number is built from the decimal text, so `2999` cents becomes the
    /// literal `29.99` on the wire.
    pub fn to_json_number(&self) -> serde_json::Number {
        if self.minor() == 0 {
            return serde_json::Number::from(self.major());
        }
        // A rendered "<int>.<2 digits>" always parses as a finite f64.
        self.to_major_string()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .unwrap_or_else(|| serde_json::Number::from(self.major()))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display. Frontends format with their own locale rules.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_major_string())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the `i64` bounds, same as [`Money::saturating_add`].
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_checked_mul_quantity_overflow() {
        assert_eq!(
            Money::from_cents(3000).checked_mul_quantity(2),
            Some(Money::from_cents(6000))
        );
        assert!(Money::from_cents(i64::MAX / 2 + 1)
            .checked_mul_quantity(2)
            .is_none());
    }

    #[test]
    fn test_saturating_add() {
        let big = Money::from_cents(i64::MAX - 1);
        assert_eq!(big.saturating_add(Money::from_cents(10)).cents(), i64::MAX);
    }

    #[test]
    fn test_add_operator_saturates() {
        assert_eq!(
            Money::from_cents(1000) + Money::from_cents(99),
            Money::from_cents(1099)
        );
        assert_eq!(
            Money::from_cents(i64::MAX) + Money::from_cents(1),
            Money::from_cents(i64::MAX)
        );
        assert_eq!(
            Money::from_cents(i64::MIN) + Money::from_cents(-1),
            Money::from_cents(i64::MIN)
        );
    }

    #[test]
    fn test_to_json_number() {
        assert_eq!(Money::from_cents(3000).to_json_number().to_string(), "30");
        assert_eq!(
            Money::from_cents(2999).to_json_number().to_string(),
            "29.99"
        );
        assert_eq!(Money::from_cents(5).to_json_number().to_string(), "0.05");
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(2999)).unwrap();
        assert_eq!(json, "2999");
        let back: Money = serde_json::from_str("2999").unwrap();
        assert_eq!(back, Money::from_cents(2999));
    }
}
