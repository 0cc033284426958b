//! Fixed-point decimal arithmetic.
//!
//! Readings and pH values are carried as `i64` micro-units (6 fractional
//! digits). Every division rounds to nearest with ties away from zero, so
//! repeated averaging never drifts the way `f64` accumulation does.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Fractional digits carried by [`Fixed`].
pub const FRACTION_DIGITS: u32 = 6;
/// Micro-units per whole unit.
pub const SCALE: i64 = 1_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFixedError {
    #[error("empty decimal")]
    Empty,
    #[error("invalid decimal: {0:?}")]
    Invalid(String),
    #[error("decimal out of range: {0:?}")]
    Overflow(String),
}

/// Signed decimal with a fixed scale of 6 fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    #[inline]
    pub const fn micros(self) -> i64 {
        self.0
    }

    /// Whole-number value. `None` if it does not fit the scaled range.
    #[inline]
    pub fn from_int(v: i64) -> Option<Self> {
        v.checked_mul(SCALE).map(Self)
    }

    /// Quantize a float to micro-units, rounding to nearest.
    /// Non-finite or out-of-range values yield `None`.
    pub fn from_f64(x: f64) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        let scaled = (x * SCALE as f64).round();
        if scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn checked_add(self, rhs: Fixed) -> Option<Fixed> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// `self * num / den`, rounded to nearest with ties away from zero.
    ///
    /// Uses 128-bit intermediates; `None` when `den == 0` or the result
    /// leaves the `i64` range.
    pub fn mul_ratio(self, num: i64, den: i64) -> Option<Fixed> {
        if den == 0 {
            return None;
        }
        let n = i128::from(self.0) * i128::from(num);
        let q = div_round_nearest_i128(n, i128::from(den));
        i64::try_from(q).ok().map(Self)
    }
}

/// Integer division rounded to nearest, ties away from zero. `den != 0`.
#[inline]
pub fn div_round_nearest_i128(num: i128, den: i128) -> i128 {
    let q = num / den;
    let r = num % den;
    if 2 * r.abs() >= den.abs() {
        if (num < 0) == (den < 0) { q + 1 } else { q - 1 }
    } else {
        q
    }
}

impl FromStr for Fixed {
    type Err = ParseFixedError;

    /// Parses plain decimal text (`"-1.25"`, `"+3"`, `".5"`). Digits past the
    /// sixth fractional place are rounded half away from zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(ParseFixedError::Empty);
        }
        let invalid = || ParseFixedError::Invalid(t.to_string());
        let overflow = || ParseFixedError::Overflow(t.to_string());

        let (negative, body) = match t.as_bytes()[0] {
            b'-' => (true, &t[1..]),
            b'+' => (false, &t[1..]),
            _ => (false, t),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut micros: i64 = 0;
        for b in int_part.bytes() {
            micros = micros
                .checked_mul(10)
                .and_then(|m| m.checked_add(i64::from(b - b'0')))
                .ok_or_else(overflow)?;
        }
        micros = micros.checked_mul(SCALE).ok_or_else(overflow)?;

        let mut place = SCALE / 10;
        for b in frac_part.bytes().take(FRACTION_DIGITS as usize) {
            micros = micros
                .checked_add(i64::from(b - b'0') * place)
                .ok_or_else(overflow)?;
            place /= 10;
        }
        if let Some(next) = frac_part.bytes().nth(FRACTION_DIGITS as usize)
            && next >= b'5'
        {
            micros = micros.checked_add(1).ok_or_else(overflow)?;
        }

        Ok(Self(if negative { -micros } else { micros }))
    }
}

impl fmt::Display for Fixed {
    /// Shortest exact form: trailing fractional zeros are dropped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u64;
        let int = abs / scale;
        let frac = abs % scale;
        if frac == 0 {
            return write!(f, "{sign}{int}");
        }
        let digits = format!("{frac:06}");
        write!(f, "{sign}{int}.{}", digits.trim_end_matches('0'))
    }
}

impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}
