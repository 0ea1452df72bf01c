use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::str::FromStr;

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

use super::FixedError;

const FRACTIONAL_BITS: u32 = 32;
const ONE_RAW: i64 = 1 << FRACTIONAL_BITS;
const HALF_RAW: i64 = 1 << (FRACTIONAL_BITS - 1);

/// Largest raw magnitude of a non-negative result.
const POSITIVE_LIMIT: u128 = i64::MAX as u128;
/// Largest raw magnitude of a negative result (`|i64::MIN|`).
const NEGATIVE_LIMIT: u128 = 1 << 63;

/// Q31.32 fixed-point number: a signed 64-bit raw integer holding `value * 2^32`.
///
/// Equality, ordering and hashing all operate on the raw integer. Conversions are
/// explicit; there is no implicit float round trip anywhere in the simulation.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedScalar(i64);

impl FixedScalar {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW);
    pub const HALF: Self = Self(HALF_RAW);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);
    /// Smallest positive step, 2^-32.
    pub const EPSILON: Self = Self(1);
    pub const PI: Self = Self(0x3_243F_6A88);
    pub const PI_OVER_2: Self = Self(0x1_921F_B544);
    pub const PI_TIMES_2: Self = Self(0x6_487E_D511);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The underlying Q31.32 integer.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Exact conversion from an integer; every `i32` is representable.
    pub const fn from_int(value: i32) -> Self {
        Self((value as i64) << FRACTIONAL_BITS)
    }

    /// Same bits viewed as the `fixed` crate's Q31.32 type.
    const fn bits(self) -> I32F32 {
        I32F32::from_bits(self.0)
    }

    /// Converts a float, clamping out-of-range values to `MIN`/`MAX` and mapping NaN to zero.
    ///
    /// Prefer `TryFrom<f64>` where an out-of-range literal should be reported instead.
    pub fn saturating_from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        I32F32::saturating_from_num(value).into()
    }

    /// Integer part, rounded toward negative infinity.
    pub const fn to_i32(self) -> i32 {
        (self.0 >> FRACTIONAL_BITS) as i32
    }

    pub fn to_f64(self) -> f64 {
        self.bits().to_num()
    }

    pub fn to_f32(self) -> f32 {
        self.bits().to_num()
    }

    /// Returns -1, 0 or 1.
    pub const fn signum(self) -> i32 {
        self.0.signum() as i32
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value. `abs(MIN)` is `MAX` since `-MIN` is not representable.
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Absolute value without the `MIN` guard; `fast_abs(MIN)` is unspecified.
    pub const fn fast_abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Largest integral value less than or equal to `self`.
    pub const fn floor(self) -> Self {
        Self(self.bits().floor().to_bits())
    }

    /// Smallest integral value greater than or equal to `self`; saturates at `MAX`.
    pub const fn ceiling(self) -> Self {
        Self(self.bits().saturating_ceil().to_bits())
    }

    /// Rounds to the nearest integral value; exact halves go to the even neighbour.
    pub const fn round(self) -> Self {
        Self(self.bits().saturating_round_ties_even().to_bits())
    }

    /// Wrapping addition for hot paths whose bounds are known to be safe.
    pub const fn fast_add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }

    /// Wrapping subtraction for hot paths whose bounds are known to be safe.
    pub const fn fast_sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }

    /// Multiplication that reports overflow instead of saturating.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        i64::try_from(wide_product(self, rhs)).ok().map(Self)
    }

    /// Multiplication without overflow handling; the result wraps when out of range.
    pub fn fast_mul(self, rhs: Self) -> Self {
        Self(wide_product(self, rhs) as i64)
    }

    /// Division rounded half away from zero at the last fractional bit.
    ///
    /// A quotient beyond the representable range saturates toward the sign of the
    /// exact result; a zero divisor is an error.
    pub fn try_div(self, rhs: Self) -> Result<Self, FixedError> {
        if rhs.0 == 0 {
            return Err(FixedError::DivideByZero);
        }

        let negative = (self.0 ^ rhs.0) < 0;
        let (limit, saturated) = if negative {
            (NEGATIVE_LIMIT, Self::MIN)
        } else {
            (POSITIVE_LIMIT, Self::MAX)
        };

        // One guard bit below 2^-32 drives the final rounding step.
        let dividend = u128::from(self.0.unsigned_abs()) << (FRACTIONAL_BITS + 1);
        let divisor = u128::from(rhs.0.unsigned_abs());
        let Some(scaled) = restoring_divide(dividend, divisor, limit << 1) else {
            return Ok(saturated);
        };

        let magnitude = (scaled + 1) >> 1;
        let signed = if negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        Ok(Self(signed as i64))
    }

    /// Remainder with the sign of the dividend. `MIN % -1` is zero.
    pub fn try_rem(self, rhs: Self) -> Result<Self, FixedError> {
        if rhs.0 == 0 {
            return Err(FixedError::DivideByZero);
        }
        Ok(Self(self.0.wrapping_rem(rhs.0)))
    }

    /// Plain integer remainder.
    ///
    /// # Panics
    /// Panics when `rhs` is zero, and when `self` is `MIN` and `rhs` is the raw value -1.
    pub fn fast_rem(self, rhs: Self) -> Self {
        Self(self.0 % rhs.0)
    }
}

/// Full-width product scaled back to Q31.32, rounded toward negative infinity.
fn wide_product(x: FixedScalar, y: FixedScalar) -> i128 {
    (i128::from(x.0) * i128::from(y.0)) >> FRACTIONAL_BITS
}

fn saturate_to_raw(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Shift-and-subtract long division. Returns `None` as soon as the partial quotient
/// exceeds `cap`; bits are produced most significant first so it can only grow.
fn restoring_divide(dividend: u128, divisor: u128, cap: u128) -> Option<u128> {
    let mut quotient = 0_u128;
    let mut remainder = 0_u128;
    let width = u128::BITS - dividend.leading_zeros();

    for bit in (0..width).rev() {
        remainder = (remainder << 1) | ((dividend >> bit) & 1);
        if remainder >= divisor {
            remainder -= divisor;
            quotient |= 1_u128 << bit;
            if quotient > cap {
                return None;
            }
        }
    }

    Some(quotient)
}

impl Add for FixedScalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for FixedScalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for FixedScalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(saturate_to_raw(wide_product(self, rhs)))
    }
}

impl Div for FixedScalar {
    type Output = Self;

    /// # Panics
    /// Panics when `rhs` is zero, like integer division.
    fn div(self, rhs: Self) -> Self {
        match self.try_div(rhs) {
            Ok(quotient) => quotient,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Rem for FixedScalar {
    type Output = Self;

    /// # Panics
    /// Panics when `rhs` is zero, like integer remainder.
    fn rem(self, rhs: Self) -> Self {
        match self.try_rem(rhs) {
            Ok(remainder) => remainder,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Neg for FixedScalar {
    type Output = Self;
    fn neg(self) -> Self {
        Self(self.0.checked_neg().unwrap_or(i64::MAX))
    }
}

impl From<i32> for FixedScalar {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl TryFrom<i64> for FixedScalar {
    type Error = FixedError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .map(Self::from_int)
            .map_err(|_| FixedError::OutOfRange)
    }
}

impl TryFrom<f64> for FixedScalar {
    type Error = FixedError;

    /// Rounds to the nearest 2^-32 step, ties to even.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(FixedError::NotFinite);
        }
        I32F32::checked_from_num(value)
            .map(Self::from)
            .ok_or(FixedError::OutOfRange)
    }
}

impl TryFrom<f32> for FixedScalar {
    type Error = FixedError;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::try_from(f64::from(value))
    }
}

impl From<I32F32> for FixedScalar {
    fn from(value: I32F32) -> Self {
        Self(value.to_bits())
    }
}

impl From<FixedScalar> for I32F32 {
    fn from(value: FixedScalar) -> Self {
        I32F32::from_bits(value.0)
    }
}

impl fmt::Display for FixedScalar {
    /// Decimal text that parses back to the same value; honours `{:.N}` precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bits(), f)
    }
}

impl fmt::Debug for FixedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedScalar")
            .field(&format_args!("{self}"))
            .finish()
    }
}

impl FromStr for FixedScalar {
    type Err = FixedError;

    /// Parses a decimal literal, rounding to the nearest 2^-32 step with ties to even.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match I32F32::overflowing_from_str(s.trim()) {
            Ok((_, true)) => Err(FixedError::OutOfRange),
            Ok((value, false)) => Ok(value.into()),
            Err(_) => Err(FixedError::Parse(s.to_string())),
        }
    }
}
