// Path: crates/types/src/app/threshold.rs

//! Exact rational thresholds for quorum, pass, and veto decisions.
//!
//! A `Threshold` keeps its numerator and denominator, so `1/3` is one third and
//! not the nearest 18-digit decimal. Weights are compared against it by
//! cross-multiplication in `u128`, which cannot overflow for `u64` operands.

use crate::app::decimal::{Decimal, DECIMAL_PRECISION};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

const DECIMAL_DENOMINATOR: u64 = 10u64.pow(DECIMAL_PRECISION);

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// A non-negative ratio `num / den`, stored in lowest terms.
///
/// A zero denominator is representable (it can only arrive through decoding)
/// but never reached or exceeded, and fails [`Threshold::is_unit_interval`].
#[derive(Encode, Decode, Clone, Copy)]
pub struct Threshold {
    num: u64,
    den: u64,
}

impl Threshold {
    /// Builds `num / den` in lowest terms.
    pub const fn new(num: u64, den: u64) -> Self {
        let g = gcd(num, den);
        if g <= 1 {
            return Self { num, den };
        }
        Self {
            num: num / g,
            den: den / g,
        }
    }

    /// A whole percentage, e.g. `percent(50)` is `1/2`.
    pub const fn percent(p: u64) -> Self {
        Self::new(p, 100)
    }

    /// The numerator in lowest terms.
    pub const fn numerator(&self) -> u64 {
        self.num
    }

    /// The denominator in lowest terms.
    pub const fn denominator(&self) -> u64 {
        self.den
    }

    /// The exact value of a decimal, if it fits a `u64` numerator.
    pub fn from_decimal(d: Decimal) -> Option<Self> {
        u64::try_from(d.raw())
            .ok()
            .map(|num| Self::new(num, DECIMAL_DENOMINATOR))
    }

    /// Returns true if `weight / total` is strictly greater than the threshold.
    /// An empty ratio (`total == 0`) never exceeds it.
    pub fn is_exceeded_by(&self, weight: u64, total: u64) -> bool {
        if total == 0 || self.den == 0 {
            return false;
        }
        weight as u128 * self.den as u128 > self.num as u128 * total as u128
    }

    /// Returns true if `weight / total` is at least the threshold.
    /// An empty ratio (`total == 0`) never reaches it.
    pub fn is_reached_by(&self, weight: u64, total: u64) -> bool {
        if total == 0 || self.den == 0 {
            return false;
        }
        weight as u128 * self.den as u128 >= self.num as u128 * total as u128
    }

    /// Returns true if the value lies in the closed interval `[0, 1]`.
    pub fn is_unit_interval(&self) -> bool {
        self.den != 0 && self.num <= self.den
    }

    /// Returns true if the value lies in the open interval `(0, 1)`.
    pub fn is_open_unit_interval(&self) -> bool {
        self.den != 0 && self.num > 0 && self.num < self.den
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        if self.den == 0 || other.den == 0 {
            return self.num == other.num && self.den == other.den;
        }
        self.num as u128 * other.den as u128 == other.num as u128 * self.den as u128
    }
}

impl Eq for Threshold {}

impl FromStr for Threshold {
    type Err = String;

    /// Accepts exact ratios (`"1/3"`) and plain decimals (`"0.334"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let num: u64 = num
                .trim()
                .parse()
                .map_err(|e| format!("invalid ratio numerator '{}': {}", num, e))?;
            let den: u64 = den
                .trim()
                .parse()
                .map_err(|e| format!("invalid ratio denominator '{}': {}", den, e))?;
            if den == 0 {
                return Err("ratio denominator must be non-zero".into());
            }
            return Ok(Self::new(num, den));
        }
        let d: Decimal = s.parse()?;
        Self::from_decimal(d).ok_or_else(|| format!("threshold '{}' is too large", s))
    }
}

impl core::fmt::Display for Threshold {
    /// Decimal form when exact, `num/den` otherwise.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.den != 0 && DECIMAL_DENOMINATOR % self.den == 0 {
            let raw = self.num as u128 * (DECIMAL_DENOMINATOR / self.den) as u128;
            if raw <= u64::MAX as u128 {
                return write!(f, "{}", Decimal::from_raw(raw));
            }
        }
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl core::fmt::Debug for Threshold {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Threshold({})", self)
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
