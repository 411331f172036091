// Path: crates/types/src/app/decimal.rs

//! A deterministic fixed-point decimal for reported vote shares.
//!
//! Floating point is never used in consensus paths. A `Decimal` stores its value
//! scaled by 10^18 in a `u128`. Shares are rounded down, so a `Decimal` is for
//! reporting only; outcomes are decided against an exact `Threshold`.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const DECIMAL_PRECISION: u32 = 18;
const SCALE: u128 = 1_000_000_000_000_000_000;

/// A non-negative fixed-point number with 18 fractional digits.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal(u128);

impl Decimal {
    /// The value `0`.
    pub const ZERO: Decimal = Decimal(0);
    /// The value `1`.
    pub const ONE: Decimal = Decimal(SCALE);

    /// Builds a decimal from its raw scaled representation.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns the raw scaled representation.
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Builds a decimal from a whole percentage, e.g. `percent(50)` is `0.5`.
    pub const fn percent(p: u64) -> Self {
        Self(p as u128 * (SCALE / 100))
    }

    /// Returns `num / den` rounded down. A zero denominator yields zero.
    pub fn from_ratio(num: u64, den: u64) -> Self {
        if den == 0 {
            return Self::ZERO;
        }
        Self(num as u128 * SCALE / den as u128)
    }

    /// Checked addition.
    pub fn checked_add(self, other: Decimal) -> Option<Decimal> {
        self.0.checked_add(other.0).map(Decimal)
    }
}

impl FromStr for Decimal {
    type Err = String;

    /// Accepts plain decimals (`"0.5"`, `"1"`, `".25"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("empty decimal".into());
        }
        if frac_part.len() > DECIMAL_PRECISION as usize {
            return Err(format!(
                "decimal '{}' has more than {} fractional digits",
                s, DECIMAL_PRECISION
            ));
        }
        let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(format!("invalid decimal '{}'", s));
        }

        let int: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|e| format!("invalid decimal '{}': {}", s, e))?
        };
        let mut frac: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|e| format!("invalid decimal '{}': {}", s, e))?
        };
        for _ in frac_part.len()..DECIMAL_PRECISION as usize {
            frac *= 10;
        }
        int.checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .map(Decimal)
            .ok_or_else(|| format!("decimal '{}' overflows", s))
    }
}

impl core::fmt::Display for Decimal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let int = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac == 0 {
            return write!(f, "{}", int);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", int, digits.trim_end_matches('0'))
    }
}

impl core::fmt::Debug for Decimal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
