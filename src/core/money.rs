//! Money helpers - parsing, minor-unit conversion and naira formatting.
//!
//! Amounts travel through the crate as [`Decimal`] with at most two decimal
//! places and are stored as whole kobo.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Converts a decimal naira amount to kobo.
///
/// # Errors
/// Returns `Error::Validation` if the amount has more than two decimal places
/// or does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount.normalize().scale() > 2 {
        return Err(Error::validation(format!(
            "Amount {amount} has more than two decimal places"
        )));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|kobo| kobo.to_i64())
        .ok_or_else(|| Error::validation(format!("Amount {amount} is out of range")))
}

/// Converts kobo back to a two-decimal naira amount.
#[must_use]
pub fn from_minor_units(kobo: i64) -> Decimal {
    Decimal::new(kobo, 2)
}

/// Parses a user-entered amount such as `"25000"`, `"25,000.50"` or `"₦1,500"`.
///
/// # Errors
/// Returns `Error::Validation` when the text is not a number, is negative,
/// or has more than two decimal places.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('₦')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(Error::validation("Amount is required"));
    }
    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| Error::validation(format!("'{input}' is not a valid amount")))?;
    if amount.is_sign_negative() {
        return Err(Error::validation("Amount cannot be negative"));
    }
    to_minor_units(amount)?;
    Ok(amount.round_dp(2))
}

/// Formats an amount as naira with thousands separators, e.g. `₦25,000.00`.
///
/// Negative amounts keep the sign after the currency symbol (`₦-5,000.00`).
#[must_use]
pub fn format_naira(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("₦{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_minor_unit_conversion() {
        assert_eq!(to_minor_units(Decimal::new(2_500_000, 2)).unwrap(), 2_500_000);
        assert_eq!(to_minor_units(Decimal::from(5000)).unwrap(), 500_000);
        assert_eq!(from_minor_units(500_050), Decimal::new(500_050, 2));
        assert!(to_minor_units(Decimal::new(1, 3)).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("25000").unwrap(), Decimal::from(25000));
        assert_eq!(parse_amount("25,000.50").unwrap(), Decimal::new(2_500_050, 2));
        assert_eq!(parse_amount("₦1,500").unwrap(), Decimal::from(1500));
        assert_eq!(parse_amount(" 10.5 ").unwrap(), Decimal::new(105, 1));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(parse_amount("abc"), Err(Error::Validation { .. })));
        assert!(matches!(parse_amount(""), Err(Error::Validation { .. })));
        assert!(matches!(parse_amount("-5"), Err(Error::Validation { .. })));
        assert!(matches!(parse_amount("1.234"), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_format_naira() {
        assert_eq!(format_naira(Decimal::from(25000)), "₦25,000.00");
        assert_eq!(format_naira(Decimal::new(123_456_789, 2)), "₦1,234,567.89");
        assert_eq!(format_naira(Decimal::ZERO), "₦0.00");
        assert_eq!(format_naira(Decimal::from(999)), "₦999.00");
        assert_eq!(format_naira(Decimal::from(-5000)), "₦-5,000.00");
    }
}
