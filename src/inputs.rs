//! Coercion of raw, user-entered values into `Decimal`.
//!
//! These functions back live form inputs and must tolerate every keystroke:
//! the fallible [`IntoZakatDecimal`] reports what went wrong so the engine can
//! surface a warning, while [`normalize_amount`] never fails and falls back to
//! zero.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::ZakatError;

/// Trait for converting various raw inputs into `Decimal` for Zakat calculations.
///
/// This lets hosts pass `i32`, `f64`, `&str`, JSON values, etc. directly into
/// engine operations without wrapping them in `dec!()` or `Decimal::from()`.
pub trait IntoZakatDecimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError>;
}

impl IntoZakatDecimal for Decimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        Ok(self)
    }
}

impl IntoZakatDecimal for &Decimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        Ok(*self)
    }
}

macro_rules! impl_into_zakat_decimal_int {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_int!(i32, u32, i64, u64, isize, usize);

// Floats go through their shortest round-trip text form so that 0.1 becomes
// exactly 0.1 rather than its binary expansion.
macro_rules! impl_into_zakat_decimal_float {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    if !self.is_finite() {
                        return Err(ZakatError::invalid(self.to_string(), "is not a finite number"));
                    }
                    parse_amount(&self.to_string())
                }
            }
        )*
    };
}

impl_into_zakat_decimal_float!(f32, f64);

impl IntoZakatDecimal for &str {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        parse_amount(self)
    }
}

impl IntoZakatDecimal for String {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        parse_amount(&self)
    }
}

impl IntoZakatDecimal for &String {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        parse_amount(self)
    }
}

impl IntoZakatDecimal for &serde_json::Value {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        use serde_json::Value;
        match self {
            Value::Null => Ok(Decimal::ZERO),
            Value::String(s) => parse_amount(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Decimal::from(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Decimal::from(u))
                } else {
                    parse_amount(&n.to_string())
                }
            }
            other => Err(ZakatError::invalid(other.to_string(), "is not a number")),
        }
    }
}

impl IntoZakatDecimal for serde_json::Value {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        (&self).into_zakat_decimal()
    }
}

/// A missing value is an empty field, which is zero.
impl<T: IntoZakatDecimal> IntoZakatDecimal for Option<T> {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        match self {
            Some(v) => v.into_zakat_decimal(),
            None => Ok(Decimal::ZERO),
        }
    }
}

/// Parses a raw amount string.
///
/// Surrounding whitespace and thousands separators (`,` and `_`) are ignored,
/// an empty string is zero, and scientific notation is accepted. `NaN`,
/// infinities and anything else unparseable are errors.
pub fn parse_amount(raw: &str) -> Result<Decimal, ZakatError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(unsigned)
        .or_else(|_| Decimal::from_scientific(unsigned))
        .map_err(|_| ZakatError::invalid(raw.trim(), "is not a valid number"))
}

/// Fail-safe coercion: any malformed input yields zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use zakat_engine::inputs::normalize_amount;
///
/// assert_eq!(normalize_amount("1,234.56"), dec!(1234.56));
/// assert_eq!(normalize_amount(""), dec!(0));
/// assert_eq!(normalize_amount("abc"), dec!(0));
/// ```
pub fn normalize_amount(raw: impl IntoZakatDecimal) -> Decimal {
    raw.into_zakat_decimal().unwrap_or(Decimal::ZERO)
}

/// Clamps an amount that must not be negative, returning the clamped value
/// and whether clamping occurred.
pub(crate) fn non_negative(value: Decimal) -> (Decimal, bool) {
    if value.is_sign_negative() && !value.is_zero() {
        (Decimal::ZERO, true)
    } else {
        (value, false)
    }
}
