//! Exact display numbers.
//!
//! An [`ExactNumber`] carries a monetary amount or unit count as a sign flag,
//! an integer magnitude and a string of fractional digits, so the two parts
//! can be rendered in distinct styles without going through floating point.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Fractional digits used for every monetary amount in a breakdown.
pub const MONEY_DIGITS: u32 = 2;

/// Fractional digits used for work-unit counts and leave.
pub const UNIT_DIGITS: u32 = 2;

/// The largest fractional precision a split can carry.
pub const MAX_FRACTIONAL_DIGITS: u32 = 28;

/// Rounds half away from zero, the one rounding rule every figure uses.
pub fn round_half_away(value: Decimal, fractional_digits: u32) -> Decimal {
    value.round_dp_with_strategy(
        fractional_digits.min(MAX_FRACTIONAL_DIGITS),
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// A value split into integer and fractional parts for display.
///
/// The sign lives in `negative` only; `int` and `float` are magnitudes, so
/// `-0.50` is `{ int: 0, float: "50", negative: true }`.
///
/// # Example
///
/// ```
/// use earnings_engine::models::ExactNumber;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = ExactNumber::split(Decimal::from_str("1234.565").unwrap(), 2).unwrap();
/// assert_eq!(value.int, 1234);
/// assert_eq!(value.float, "57");
/// assert_eq!(value.to_string(), "1234.57");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExactNumber {
    /// The integer magnitude.
    pub int: u64,
    /// The fractional digits, leading zeros preserved.
    #[serde(default)]
    pub float: String,
    /// True when the value is strictly below zero.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negative: bool,
}

impl ExactNumber {
    /// Rounds `value` half away from zero to `fractional_digits` and splits it.
    ///
    /// Precision above [`MAX_FRACTIONAL_DIGITS`] is capped. A value that rounds
    /// to zero is never negative.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` when the integer magnitude does not fit in a `u64`.
    pub fn split(value: Decimal, fractional_digits: u32) -> EngineResult<Self> {
        let digits = fractional_digits.min(MAX_FRACTIONAL_DIGITS);
        let rounded = round_half_away(value, digits);
        let magnitude = rounded.abs();

        let int = magnitude
            .trunc()
            .to_u64()
            .ok_or_else(|| EngineError::Overflow {
                value: value.to_string(),
            })?;

        let text = format!("{:.*}", digits as usize, magnitude);
        let float = text
            .split_once('.')
            .map(|(_, fraction)| fraction.to_string())
            .unwrap_or_default();

        Ok(Self {
            int,
            float,
            negative: !rounded.is_zero() && rounded.is_sign_negative(),
        })
    }

    /// Returns zero with the given number of fractional digits.
    pub fn zero(fractional_digits: u32) -> Self {
        Self {
            int: 0,
            float: "0".repeat(fractional_digits.min(MAX_FRACTIONAL_DIGITS) as usize),
            negative: false,
        }
    }

    /// Reconstructs the decimal value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumber` if `float` holds anything but digits or the
    /// value cannot be held by a `Decimal`.
    pub fn to_decimal(&self) -> EngineResult<Decimal> {
        let text = self.to_string();
        if !self.float.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::InvalidNumber {
                value: text,
                message: "fractional part must contain only digits".to_string(),
            });
        }
        Decimal::from_str_exact(&text).map_err(|e| EngineError::InvalidNumber {
            value: text.clone(),
            message: e.to_string(),
        })
    }

    /// Returns true when the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.int == 0 && self.float.bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for ExactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        if self.float.is_empty() {
            write!(f, "{}", self.int)
        } else {
            write!(f, "{}.{}", self.int, self.float)
        }
    }
}

impl FromStr for ExactNumber {
    type Err = EngineError;

    /// Parses plain decimal text such as `"60000.50"` without rounding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| EngineError::InvalidNumber {
            value: s.to_string(),
            message: message.to_string(),
        };

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_text, float_text) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if int_text.is_empty() || !int_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("integer part must be one or more digits"));
        }
        if !float_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("fractional part must contain only digits"));
        }
        if float_text.len() > MAX_FRACTIONAL_DIGITS as usize {
            return Err(invalid("too many fractional digits"));
        }

        let int = int_text.parse::<u64>().map_err(|_| EngineError::Overflow {
            value: s.to_string(),
        })?;

        let mut number = Self {
            int,
            float: float_text.to_string(),
            negative,
        };
        if number.is_zero() {
            number.negative = false;
        }
        Ok(number)
    }
}
