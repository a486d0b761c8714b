//! Monetary amounts stored as integer cents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InvalidValueObject;

const CENTS_PER_UNIT: i64 = 100;
const MAX_CENTS: i64 = 9_000_000_000_000_000;
const AMOUNT_INVALID: &str = "Amount must be a finite decimal number";

/// Amount of money in cents.
///
/// The HTTP edge speaks decimals; the domain and persistence only ever see
/// cents so sums are exact.
///
/// # Examples
/// ```
/// use atelier::domain::Money;
///
/// let price: Money = "199.9".parse().expect("decimal amount");
/// assert_eq!(price.cents(), 19_990);
/// assert_eq!(price.to_string(), "199.90");
/// assert_eq!(Money::from_decimal(1.005).expect("finite").cents(), 101);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Wrap a cent amount.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Raw cent amount.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rounding half away from zero to the cent.
    ///
    /// The number is read through its shortest decimal rendering, so
    /// `1.005` becomes 101 cents rather than whatever its binary
    /// approximation would round to.
    pub fn from_decimal(amount: f64) -> Result<Self, InvalidValueObject> {
        amount.to_string().parse()
    }

    /// Decimal representation for transport.
    #[must_use]
    pub fn to_decimal(self) -> f64 {
        #[expect(clippy::cast_precision_loss, reason = "amounts stay far below 2^52 cents")]
        let value = self.0 as f64;
        value / 100.0
    }

    /// Sum, or `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// True for strictly positive amounts.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl FromStr for Money {
    type Err = InvalidValueObject;

    /// Parse `[+-]units[.fraction]`, rounding half away from zero to the
    /// cent. Exponents, separators and non-finite values are rejected.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidValueObject::new(AMOUNT_INVALID);
        let trimmed = raw.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if (units.is_empty() && fraction.is_empty()) || !all_digits(units) || !all_digits(fraction)
        {
            return Err(invalid());
        }

        let units: i64 = if units.is_empty() {
            0
        } else {
            units.parse().map_err(|_| invalid())?
        };
        let mut decimals = fraction.bytes().map(|byte| i64::from(byte - b'0'));
        let tenths = decimals.next().unwrap_or(0);
        let hundredths = decimals.next().unwrap_or(0);
        let round_up = decimals.next().is_some_and(|digit| digit >= 5);
        let cents = units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|cents| cents.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .filter(|cents| *cents <= MAX_CENTS)
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|money| money.0).fold(0_i64, i64::saturating_add))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs.div_euclid(CENTS_PER_UNIT.unsigned_abs());
        let cents = abs.rem_euclid(CENTS_PER_UNIT.unsigned_abs());
        write!(f, "{sign}{units}.{cents:02}")
    }
}
